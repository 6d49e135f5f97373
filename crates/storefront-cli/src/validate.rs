use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Context;
use storefront_core::{load_catalog, AppConfig, CatalogSource};

/// Loads and validates a catalog file, returning a one-line-per-product
/// summary.
pub(crate) fn run_validate(config: &AppConfig, catalog: Option<PathBuf>) -> anyhow::Result<String> {
    let path = match (catalog, &config.catalog_source) {
        (Some(path), _) => path,
        (None, CatalogSource::File(path)) => path.clone(),
        (None, CatalogSource::Remote { shop_url }) => anyhow::bail!(
            "catalog source is the remote storefront {shop_url}; pass --catalog to validate a file"
        ),
    };

    let catalog = load_catalog(&path)
        .with_context(|| format!("catalog {} is invalid", path.display()))?;
    tracing::info!(path = %path.display(), products = catalog.products.len(), "catalog is valid");

    let mut summary = format!(
        "{}: {} products OK",
        path.display(),
        catalog.products.len()
    );
    for product in &catalog.products {
        let combined = if product.is_combined_listing(&config.combined_listing_tag) {
            " (combined listing)"
        } else {
            ""
        };
        let _ = write!(
            summary,
            "\n  {}: {} options, {} variants{combined}",
            product.handle,
            product.options.len(),
            product.variants.len()
        );
    }
    Ok(summary)
}
