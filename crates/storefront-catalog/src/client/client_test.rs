use super::*;

#[test]
fn product_url_strips_collection_path() {
    let url = ShopifyClient::product_url("https://lamps.example.com/collections/all", "dragonfly-lamp")
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://lamps.example.com/products/dragonfly-lamp.json"
    );
}

#[test]
fn product_url_strips_trailing_slash() {
    let url = ShopifyClient::product_url("https://lamps.example.com/", "peony").unwrap();
    assert_eq!(url.as_str(), "https://lamps.example.com/products/peony.json");
}

#[test]
fn product_url_keeps_port() {
    let url = ShopifyClient::product_url("http://127.0.0.1:8080", "peony").unwrap();
    assert_eq!(url.as_str(), "http://127.0.0.1:8080/products/peony.json");
}

#[test]
fn product_url_rejects_invalid_origin() {
    let err = ShopifyClient::product_url("not-a-url", "peony").unwrap_err();
    assert!(
        matches!(err, CatalogError::InvalidShopUrl { .. }),
        "expected InvalidShopUrl, got: {err:?}"
    );
}

#[test]
fn extract_store_origin_rejects_other_schemes() {
    let err = extract_store_origin("ftp://lamps.example.com").unwrap_err();
    assert!(matches!(err, CatalogError::InvalidShopUrl { .. }));
}

#[test]
fn extract_domain_returns_host() {
    assert_eq!(
        extract_domain("https://lamps.example.com/collections/all"),
        "lamps.example.com"
    );
    assert_eq!(extract_domain("not-a-url"), "not-a-url");
}
