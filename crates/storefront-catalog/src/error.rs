use storefront_core::{ConfigError, CoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("normalization error for product {source_product_id}: {reason}")]
    Normalization {
        source_product_id: String,
        reason: String,
    },

    #[error("invalid catalog item: {0}")]
    InvalidProduct(#[from] CoreError),

    #[error("invalid shop URL \"{shop_url}\": {reason}")]
    InvalidShopUrl { shop_url: String, reason: String },

    #[error("invalid product handle \"{0}\"")]
    InvalidHandle(String),

    #[error("no product with handle \"{0}\" in catalog")]
    UnknownHandle(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CatalogError {
    /// Returns `true` when the error means "no such product" rather than a
    /// backend failure: unknown or malformed handles, a 404 from the store,
    /// and catalog items that have no variants to show.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::InvalidHandle(_)
                | Self::UnknownHandle(_)
                | Self::InvalidProduct(CoreError::NoVariants { .. })
        )
    }
}
