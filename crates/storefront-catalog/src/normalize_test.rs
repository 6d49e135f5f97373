use super::*;
use storefront_core::CoreError;

fn raw_product(value: serde_json::Value) -> ShopifyProduct {
    serde_json::from_value(value).expect("valid Shopify product fixture")
}

fn lamp_json() -> serde_json::Value {
    serde_json::json!({
        "id": 8123456789_i64,
        "title": "Dragonfly Lamp",
        "handle": "dragonfly-lamp",
        "body_html": "<p>Hand-cut <strong>glass</strong>\n shade.</p>",
        "vendor": "Entropy Bright",
        "tags": "lamps, tiffany",
        "options": [
            { "name": "Size", "position": 2, "values": ["S", "M"] },
            { "name": "Color", "position": 1, "values": ["Red", "Blue"] }
        ],
        "variants": [
            { "id": 1, "title": "Red / S", "price": "289.00", "option1": "Red", "option2": "S", "available": false },
            { "id": 2, "title": "Red / M", "price": "309.00", "compare_at_price": "349.00", "option1": "Red", "option2": "M" },
            { "id": 3, "title": "Blue / S", "price": "289.00", "option1": "Blue", "option2": "S" },
            { "id": 4, "title": "Blue / M", "price": "", "option1": "Blue", "option2": "M" }
        ]
    })
}

#[test]
fn normalize_product_builds_global_ids() {
    let product = normalize_product(raw_product(lamp_json())).unwrap();
    assert_eq!(product.id, "gid://shopify/Product/8123456789");
    assert_eq!(product.variants[0].id, "gid://shopify/ProductVariant/1");
}

#[test]
fn normalize_product_orders_options_by_position() {
    let product = normalize_product(raw_product(lamp_json())).unwrap();
    let names: Vec<&str> = product.option_names().collect();
    assert_eq!(names, vec!["Color", "Size"]);
    assert_eq!(
        product.variants[1].selected_options,
        vec![SelectedOption::new("Color", "Red"), SelectedOption::new("Size", "M")]
    );
}

#[test]
fn normalize_product_keeps_availability_and_prices() {
    let product = normalize_product(raw_product(lamp_json())).unwrap();
    assert!(!product.variants[0].available);
    assert!(product.variants[1].available);

    let price = product.variants[1].price.as_ref().unwrap();
    assert_eq!(price.amount.to_string(), "309.00");
    assert_eq!(price.currency_code, "USD");
    assert_eq!(
        product.variants[1]
            .compare_at_price
            .as_ref()
            .map(|m| m.amount.to_string()),
        Some("349.00".to_string())
    );
    assert!(
        product.variants[3].price.is_none(),
        "empty price string should become None"
    );
}

#[test]
fn normalize_product_strips_html_description() {
    let product = normalize_product(raw_product(lamp_json())).unwrap();
    assert_eq!(
        product.description.as_deref(),
        Some("Hand-cut glass shade.")
    );
}

#[test]
fn normalize_product_empty_description_becomes_none() {
    let mut json = lamp_json();
    json["body_html"] = serde_json::json!("<p> </p>");
    json["vendor"] = serde_json::json!("");
    let product = normalize_product(raw_product(json)).unwrap();
    assert!(product.description.is_none());
    assert!(product.vendor.is_none());
}

#[test]
fn normalize_product_splits_tags() {
    let product = normalize_product(raw_product(lamp_json())).unwrap();
    assert_eq!(product.tags, vec!["lamps", "tiffany"]);
}

#[test]
fn normalize_product_uses_array_order_without_positions() {
    let mut json = lamp_json();
    json["options"] = serde_json::json!([
        { "name": "Color", "values": ["Red", "Blue"] },
        { "name": "Size", "values": ["S", "M"] }
    ]);
    let product = normalize_product(raw_product(json)).unwrap();
    assert_eq!(product.variants[2].value_of("Color"), Some("Blue"));
    assert_eq!(product.variants[2].value_of("Size"), Some("S"));
}

#[test]
fn normalize_product_error_when_no_variants() {
    let mut json = lamp_json();
    json["variants"] = serde_json::json!([]);
    let err = normalize_product(raw_product(json)).unwrap_err();
    assert!(
        matches!(err, CatalogError::InvalidProduct(CoreError::NoVariants { .. })),
        "expected NoVariants, got: {err:?}"
    );
    assert!(err.is_not_found());
}

#[test]
fn normalize_product_error_when_variant_lacks_option_value() {
    let mut json = lamp_json();
    json["variants"][2]["option2"] = serde_json::Value::Null;
    let err = normalize_product(raw_product(json)).unwrap_err();
    match err {
        CatalogError::Normalization {
            source_product_id,
            reason,
        } => {
            assert_eq!(source_product_id, "8123456789");
            assert!(reason.contains("option2"), "reason was: {reason}");
        }
        other => panic!("expected Normalization, got: {other:?}"),
    }
}

#[test]
fn normalize_product_error_on_unparseable_price() {
    let mut json = lamp_json();
    json["variants"][0]["price"] = serde_json::json!("two hundred");
    let err = normalize_product(raw_product(json)).unwrap_err();
    assert!(matches!(err, CatalogError::Normalization { .. }));
    assert!(!err.is_not_found());
}

#[test]
fn normalize_product_rejects_duplicate_combinations() {
    let mut json = lamp_json();
    json["variants"][3]["option1"] = serde_json::json!("Red");
    json["variants"][3]["option2"] = serde_json::json!("S");
    let err = normalize_product(raw_product(json)).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::InvalidProduct(CoreError::DuplicateCombination { .. })
    ));
}

#[test]
fn normalize_product_single_default_variant() {
    let product = normalize_product(raw_product(serde_json::json!({
        "id": 5,
        "title": "Gift Card",
        "handle": "gift-card",
        "options": [{ "name": "Title", "position": 1, "values": ["Default Title"] }],
        "variants": [{ "id": 50, "title": "Default Title", "price": "25.00", "option1": "Default Title" }]
    })))
    .unwrap();
    assert_eq!(product.variants.len(), 1);
    assert_eq!(product.variants[0].value_of("Title"), Some("Default Title"));
}
