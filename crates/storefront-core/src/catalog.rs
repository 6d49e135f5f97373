use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::products::Product;
use crate::ConfigError;

static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:[-_][a-z0-9]+)*$").expect("valid handle regex"));

/// Returns `true` if `handle` is a well-formed product URL slug
/// (lowercase ASCII alphanumerics separated by single `-` or `_`).
#[must_use]
pub fn is_valid_handle(handle: &str) -> bool {
    HANDLE_RE.is_match(handle)
}

/// Canonical form of a handle taken from a URL: surrounding whitespace
/// removed and ASCII letters lower-cased. Storefront handles are stored in
/// this form, so `Tulip-Lamp` and `tulip-lamp` name the same product.
pub fn normalize_handle(handle: &str) -> String {
    handle.trim().to_ascii_lowercase()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    pub products: Vec<Product>,
}

impl CatalogFile {
    /// Looks up a product by its exact handle.
    #[must_use]
    pub fn find(&self, handle: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.handle == handle)
    }
}

/// Load and validate a product catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<CatalogFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_catalog(&content)
}

/// Parse and validate a product catalog from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_catalog(content: &str) -> Result<CatalogFile, ConfigError> {
    let catalog: CatalogFile =
        serde_yaml::from_str(content).map_err(ConfigError::CatalogFileParse)?;

    validate_catalog(&catalog)?;

    Ok(catalog)
}

fn validate_catalog(catalog: &CatalogFile) -> Result<(), ConfigError> {
    let mut seen_handles = HashSet::new();
    let mut seen_ids = HashSet::new();

    for product in &catalog.products {
        if !is_valid_handle(&product.handle) {
            return Err(ConfigError::Validation(format!(
                "product '{}' has invalid handle '{}'",
                product.title, product.handle
            )));
        }

        if !seen_handles.insert(product.handle.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate product handle: '{}'",
                product.handle
            )));
        }

        if !seen_ids.insert(product.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate product id: '{}' (handle '{}')",
                product.id, product.handle
            )));
        }

        product
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
    }

    Ok(())
}
