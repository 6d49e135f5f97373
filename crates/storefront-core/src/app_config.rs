use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How the variant resolver breaks ties between variants that match a
/// partial selection on the same number of options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreak {
    /// The earliest variant in declaration order wins.
    #[default]
    DeclarationOrder,
    /// Available variants win over unavailable ones, then declaration order.
    PreferAvailable,
}

impl std::fmt::Display for TieBreak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TieBreak::DeclarationOrder => write!(f, "declaration-order"),
            TieBreak::PreferAvailable => write!(f, "prefer-available"),
        }
    }
}

/// Where product data is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// A local YAML catalog file.
    File(PathBuf),
    /// A Shopify storefront's public product endpoints.
    Remote { shop_url: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub catalog_source: CatalogSource,
    pub combined_listing_tag: String,
    /// Forward combined listings to the product behind their selected variant.
    pub combined_listing_redirect: bool,
    pub tie_break: TieBreak,
    /// Scheme and host used for canonical page URLs, without a trailing `/`.
    /// When unset, the request's `Host` header is used.
    pub public_base_url: Option<String>,
    pub fetch_timeout_secs: u64,
    pub fetch_user_agent: String,
    pub fetch_max_retries: u32,
    pub fetch_backoff_base_secs: u64,
    pub rate_limit_per_minute: usize,
    pub seo_default_title: String,
    pub seo_default_description: String,
}
