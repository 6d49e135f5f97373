//! Shop URL handling for the storefront client.

use crate::error::CatalogError;

/// Extracts the scheme+host origin from a shop URL.
///
/// Given `"https://lamps.example.com/collections/all"`, returns
/// `"https://lamps.example.com"`, so product endpoints are always addressed
/// from the store root.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidShopUrl`] if `shop_url` is not an absolute
/// `http(s)` URL with a host.
pub fn extract_store_origin(shop_url: &str) -> Result<reqwest::Url, CatalogError> {
    let invalid = |reason: String| CatalogError::InvalidShopUrl {
        shop_url: shop_url.to_owned(),
        reason,
    };
    let url = reqwest::Url::parse(shop_url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_owned()));
    }
    reqwest::Url::parse(&url.origin().ascii_serialization()).map_err(|e| invalid(e.to_string()))
}

/// Extracts the hostname from a shop URL for use in error messages.
///
/// Falls back to the full URL string if parsing fails.
pub(super) fn extract_domain(shop_url: &str) -> String {
    reqwest::Url::parse(shop_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| shop_url.to_owned())
}
