pub mod app_config;
pub mod catalog;
pub mod config;
pub mod products;
pub mod seo;

pub use app_config::{AppConfig, CatalogSource, Environment, TieBreak};
pub use catalog::{is_valid_handle, load_catalog, normalize_handle, parse_catalog, CatalogFile};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{Money, Product, ProductOption, SelectedOption, Variant};

use thiserror::Error;

/// Violations of the catalog item invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("product '{handle}' has no variants")]
    NoVariants { handle: String },

    #[error("product '{handle}' declares option '{option}' more than once")]
    DuplicateOption { handle: String, option: String },

    #[error("variant {variant_id} of '{handle}' is incomplete: {reason}")]
    IncompleteVariant {
        handle: String,
        variant_id: String,
        reason: String,
    },

    #[error("variants {first} and {second} of '{handle}' share the same option values")]
    DuplicateCombination {
        handle: String,
        first: String,
        second: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[source] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
