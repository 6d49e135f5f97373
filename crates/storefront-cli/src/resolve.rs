use std::path::PathBuf;

use anyhow::Context;
use serde_json::{json, Value};
use storefront_catalog::Catalog;
use storefront_core::{AppConfig, CatalogSource, Product};
use storefront_variants::{
    page_redirect, History, Location, MemoryHistory, PageView, ProductView, RedirectPolicy,
    SelectionState,
};

/// Points `config` at the catalog named on the command line, if any.
pub(crate) fn apply_source_override(
    config: &mut AppConfig,
    catalog: Option<PathBuf>,
    shop_url: Option<String>,
) {
    if let Some(path) = catalog {
        config.catalog_source = CatalogSource::File(path);
    } else if let Some(shop_url) = shop_url {
        config.catalog_source = CatalogSource::Remote {
            shop_url: shop_url.trim().to_string(),
        };
    }
}

pub(crate) async fn run_resolve(
    config: &AppConfig,
    handle: &str,
    query: &str,
) -> anyhow::Result<Value> {
    let catalog = Catalog::from_config(config).context("failed to open catalog")?;
    let product = catalog
        .product_by_handle(handle)
        .await
        .with_context(|| format!("failed to look up product '{handle}'"))?;

    let requested = Location {
        path: format!("/products/{handle}"),
        search: query.strip_prefix('?').unwrap_or(query).to_string(),
    };
    let policy = RedirectPolicy {
        combined_listing_tag: &config.combined_listing_tag,
        redirect_combined_listings: config.combined_listing_redirect,
        tie_break: config.tie_break,
    };
    if let Some(redirect) = page_redirect(&requested, &product, &policy) {
        return Ok(json!({
            "handle": product.handle,
            "requested": requested.href(),
            "redirect": {
                "reason": redirect.label(),
                "location": redirect.location().href(),
            },
        }));
    }
    resolve_visit(config, &product, query)
}

/// Resolves one visit to `/products/{handle}?{query}` and reports what the
/// page would show and where its address would end up.
pub(crate) fn resolve_visit(
    config: &AppConfig,
    product: &Product,
    query: &str,
) -> anyhow::Result<Value> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let page_path = format!("/products/{}", product.handle);
    let href = if query.is_empty() {
        page_path
    } else {
        format!("{page_path}?{query}")
    };

    let selection = SelectionState::from_query(query, product);
    let (page, outcome) = PageView::open(
        product,
        MemoryHistory::new(&href),
        config.tie_break,
        &config.combined_listing_tag,
    )?;
    let variant = page.resolved();
    tracing::debug!(
        handle = %product.handle,
        variant_id = %variant.id,
        outcome = outcome.label(),
        "resolved visit"
    );

    Ok(json!({
        "handle": product.handle,
        "requested": href,
        "selection": selection.pairs(),
        "selected_variant": variant,
        "sync": {
            "outcome": outcome.label(),
            "location": page.history().location().href(),
        },
        "product_view": ProductView::from_resolved(product, variant),
    }))
}
