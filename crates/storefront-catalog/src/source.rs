use storefront_core::{
    is_valid_handle, load_catalog, normalize_handle, AppConfig, CatalogFile, CatalogSource, Product,
};

use crate::client::ShopifyClient;
use crate::error::CatalogError;
use crate::normalize::normalize_product;

/// Where catalog items come from for the lifetime of a process.
pub enum Catalog {
    /// Products loaded once from a YAML file and served from memory.
    File(CatalogFile),
    /// Products fetched per lookup from a Shopify storefront.
    Remote {
        client: ShopifyClient,
        shop_url: String,
    },
}

impl Catalog {
    /// Builds the catalog named by `config.catalog_source`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Config`] if a catalog file cannot be loaded,
    /// or [`CatalogError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        match &config.catalog_source {
            CatalogSource::File(path) => {
                let catalog = load_catalog(path)?;
                tracing::info!(
                    path = %path.display(),
                    products = catalog.products.len(),
                    "loaded catalog file"
                );
                Ok(Self::File(catalog))
            }
            CatalogSource::Remote { shop_url } => {
                let client = ShopifyClient::new(
                    config.fetch_timeout_secs,
                    &config.fetch_user_agent,
                    config.fetch_max_retries,
                    config.fetch_backoff_base_secs,
                )?;
                tracing::info!(shop_url = %shop_url, "using remote storefront catalog");
                Ok(Self::Remote {
                    client,
                    shop_url: shop_url.clone(),
                })
            }
        }
    }

    /// Looks up one catalog item by handle, compared in its
    /// [`normalize_handle`] form. The returned product's `handle` may
    /// therefore differ from the requested one.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidHandle`] for an empty or malformed handle.
    /// - [`CatalogError::UnknownHandle`] when a file catalog has no such item.
    /// - Any fetch or normalization error from a remote catalog.
    pub async fn product_by_handle(&self, requested: &str) -> Result<Product, CatalogError> {
        let handle = normalize_handle(requested);
        if !is_valid_handle(&handle) {
            return Err(CatalogError::InvalidHandle(requested.to_owned()));
        }
        let handle = handle.as_str();

        match self {
            Self::File(catalog) => catalog
                .find(handle)
                .cloned()
                .ok_or_else(|| CatalogError::UnknownHandle(handle.to_owned())),
            Self::Remote { client, shop_url } => {
                let raw = client.fetch_product(shop_url, handle).await?;
                let product = normalize_product(raw)?;
                tracing::debug!(
                    handle,
                    variants = product.variants.len(),
                    "fetched product from storefront"
                );
                Ok(product)
            }
        }
    }
}
