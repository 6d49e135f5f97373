//! End-to-end page views through the public API: mount, resolve, and
//! address synchronization for the common storefront cases.

use storefront_core::{parse_catalog, Product, TieBreak};
use storefront_variants::{
    resolve, History, Location, MemoryHistory, PageView, SelectionState, SyncOutcome,
};

const CATALOG: &str = r#"
products:
  - id: "gid://shopify/Product/100"
    handle: tulip-lamp
    title: Tulip Lamp
    options:
      - name: Color
        values: [Red, Blue]
    variants:
      - id: v1
        title: Red
        selected_options: [{ name: Color, value: Red }]
      - id: v2
        title: Blue
        selected_options: [{ name: Color, value: Blue }]
  - id: "gid://shopify/Product/200"
    handle: peony-lamp
    title: Peony Lamp
    options:
      - name: Color
        values: [Red, Blue]
      - name: Size
        values: [S, M]
    variants:
      - { id: red-s, title: Red / S, selected_options: [{ name: Color, value: Red }, { name: Size, value: S }] }
      - { id: red-m, title: Red / M, selected_options: [{ name: Color, value: Red }, { name: Size, value: M }] }
      - { id: blue-s, title: Blue / S, selected_options: [{ name: Color, value: Blue }, { name: Size, value: S }] }
      - { id: blue-m, title: Blue / M, selected_options: [{ name: Color, value: Blue }, { name: Size, value: M }] }
"#;

fn product(handle: &str) -> Product {
    parse_catalog(CATALOG)
        .expect("valid catalog")
        .find(handle)
        .cloned()
        .expect("product in catalog")
}

fn open(product: &Product, href: &str) -> (String, SyncOutcome, MemoryHistory) {
    let (page, outcome) = PageView::open(
        product,
        MemoryHistory::new(href),
        TieBreak::DeclarationOrder,
        "combined",
    )
    .expect("product has variants");
    let id = page.resolved().id.clone();
    (id, outcome, page.into_history())
}

#[test]
fn fresh_visit_shows_first_available_and_writes_its_options() {
    let lamp = product("tulip-lamp");
    let (id, outcome, history) = open(&lamp, "/products/tulip-lamp");
    assert_eq!(id, "v1");
    assert_eq!(
        outcome,
        SyncOutcome::Rewritten(Location::parse("/products/tulip-lamp?Color=Red"))
    );
    assert_eq!(history.writes(), 1);
}

#[test]
fn shared_link_is_honoured_without_rewrite() {
    let lamp = product("tulip-lamp");
    let (id, outcome, history) = open(&lamp, "/products/tulip-lamp?Color=Blue");
    assert_eq!(id, "v2");
    assert_eq!(outcome, SyncOutcome::AlreadySynchronized);
    assert_eq!(history.writes(), 0);
}

#[test]
fn stale_link_falls_back_and_is_corrected() {
    let lamp = product("tulip-lamp");
    let (id, outcome, _) = open(&lamp, "/products/tulip-lamp?Color=Green");
    assert_eq!(id, "v1");
    assert_eq!(
        outcome,
        SyncOutcome::Rewritten(Location::parse("/products/tulip-lamp?Color=Red"))
    );
}

#[test]
fn partial_link_picks_first_matching_variant() {
    let lamp = product("peony-lamp");
    let (id, _, history) = open(&lamp, "/products/peony-lamp?Color=Blue");
    assert_eq!(id, "blue-s");
    assert_eq!(history.location().search, "Color=Blue&Size=S");
}

#[test]
fn every_variant_round_trips_through_its_own_link() {
    let lamp = product("peony-lamp");
    for variant in &lamp.variants {
        let search = variant
            .selected_options
            .iter()
            .map(|o| format!("{}={}", o.name, o.value))
            .collect::<Vec<_>>()
            .join("&");
        let selection = SelectionState::from_query(&search, &lamp);
        let resolved = resolve(&lamp, &selection, TieBreak::DeclarationOrder).expect("variants");
        assert_eq!(resolved.id, variant.id);
    }
}
