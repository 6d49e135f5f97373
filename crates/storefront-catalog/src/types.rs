//! Shopify response types for the public `products/{handle}.json` endpoint.
//!
//! ### Tags
//! The single-product endpoint returns tags as one comma-separated string
//! (`"combined, lamps"`), while `products.json` returns an array. Both are
//! accepted and normalized to a list of trimmed, non-empty tags.
//!
//! ### Options
//! `options[]` carries the axes in display order. Each variant names its
//! values positionally through `option1`, `option2` and `option3`.
//!
//! ### `available` on variants
//! Absent from some stores' single-product responses. Defaults to `true`.

use serde::{Deserialize, Deserializer};

/// Top-level response from `GET /products/{handle}.json`.
#[derive(Debug, Deserialize)]
pub struct ShopifyProductResponse {
    pub product: ShopifyProduct,
}

#[derive(Debug, Deserialize)]
pub struct ShopifyProduct {
    /// Shopify numeric product ID (e.g., `8123456789`).
    pub id: i64,

    pub title: String,

    pub handle: String,

    /// Raw HTML product description. May be `null` or absent.
    #[serde(default)]
    pub body_html: Option<String>,

    #[serde(default)]
    pub vendor: Option<String>,

    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,

    #[serde(default)]
    pub options: Vec<ShopifyOption>,

    #[serde(default)]
    pub variants: Vec<ShopifyVariant>,
}

#[derive(Debug, Deserialize)]
pub struct ShopifyOption {
    pub name: String,

    /// 1-based display position. Absent on some stores; array order is used then.
    #[serde(default)]
    pub position: Option<i32>,

    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ShopifyVariant {
    pub id: i64,

    pub title: String,

    /// Decimal string, e.g. `"289.00"`.
    #[serde(default)]
    pub price: Option<String>,

    #[serde(default)]
    pub compare_at_price: Option<String>,

    #[serde(default)]
    pub option1: Option<String>,

    #[serde(default)]
    pub option2: Option<String>,

    #[serde(default)]
    pub option3: Option<String>,

    #[serde(default = "default_available")]
    pub available: bool,

    #[serde(default)]
    pub position: Option<i32>,
}

impl ShopifyVariant {
    /// Returns the value for the option at 1-based `position`.
    #[must_use]
    pub fn option_value(&self, position: usize) -> Option<&str> {
        match position {
            1 => self.option1.as_deref(),
            2 => self.option2.as_deref(),
            3 => self.option3.as_deref(),
            _ => None,
        }
    }
}

fn default_available() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    Joined(String),
    List(Vec<String>),
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTags>::deserialize(deserializer)?;
    let tags: Vec<String> = match raw {
        None => Vec::new(),
        Some(RawTags::Joined(joined)) => joined.split(',').map(str::to_owned).collect(),
        Some(RawTags::List(list)) => list,
    };
    Ok(tags
        .into_iter()
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())
        .collect())
}
