//! HTTP client for a Shopify storefront's public single-product endpoint.

mod origin;

use std::time::Duration;

use reqwest::Client;

use crate::error::CatalogError;
use crate::rate_limit::retry_with_backoff;
use crate::types::{ShopifyProduct, ShopifyProductResponse};

pub use origin::extract_store_origin;
use origin::extract_domain;

/// Fetches catalog items by handle from `GET {origin}/products/{handle}.json`.
///
/// Maps 429 and 404 to typed errors and retries transient failures (429,
/// network errors) with exponential backoff up to `max_retries` additional
/// attempts.
pub struct ShopifyClient {
    client: Client,
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl ShopifyClient {
    /// Creates a client with the given timeout, `User-Agent` and retry policy.
    /// `max_retries = 0` disables retries.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches one product by handle.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidShopUrl`] if `shop_url` has no usable origin.
    /// - [`CatalogError::RateLimited`] for HTTP 429 after all retries.
    /// - [`CatalogError::NotFound`] for HTTP 404 (not retried).
    /// - [`CatalogError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`CatalogError::Http`] for network or TLS failure after all retries.
    /// - [`CatalogError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn fetch_product(
        &self,
        shop_url: &str,
        handle: &str,
    ) -> Result<ShopifyProduct, CatalogError> {
        let url = Self::product_url(shop_url, handle)?;

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(CatalogError::RateLimited {
                        domain: extract_domain(shop_url),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(CatalogError::NotFound {
                        url: url.to_string(),
                    });
                }

                if !status.is_success() {
                    return Err(CatalogError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                let body = response.text().await?;
                let parsed = serde_json::from_str::<ShopifyProductResponse>(&body).map_err(
                    |e| CatalogError::Deserialize {
                        context: format!("product '{handle}' from {shop_url}"),
                        source: e,
                    },
                )?;
                Ok(parsed.product)
            }
        })
        .await
    }

    /// Builds `{origin}/products/{handle}.json`, dropping any path the
    /// configured shop URL carries.
    fn product_url(shop_url: &str, handle: &str) -> Result<reqwest::Url, CatalogError> {
        let mut url = extract_store_origin(shop_url)?;
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidShopUrl {
                shop_url: shop_url.to_owned(),
                reason: "URL cannot be a base".to_owned(),
            })?
            .clear()
            .push("products")
            .push(&format!("{handle}.json"));
        Ok(url)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
