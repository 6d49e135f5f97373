//! Access to catalog items by handle, backed either by a local YAML file or
//! by a Shopify storefront's public product endpoint.

pub mod client;
pub mod error;
pub mod normalize;
pub mod source;
pub mod types;

mod rate_limit;

pub use client::ShopifyClient;
pub use error::CatalogError;
pub use normalize::normalize_product;
pub use source::Catalog;
pub use types::{ShopifyOption, ShopifyProduct, ShopifyProductResponse, ShopifyVariant};
