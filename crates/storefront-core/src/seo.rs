//! Page metadata assembly.
//!
//! Builder-authored pages can arrive with the page builder's own placeholder
//! title and an empty description. [`apply_meta_defaults`] swaps those for
//! the store's defaults so every page ends up with a usable title.

use serde::Serialize;

use crate::products::{Product, Variant};

/// Title fragment the page builder emits when a page has no title of its own.
pub const BUILDER_PLACEHOLDER_TITLE: &str = "Weaverse";

/// One `<head>` metadata entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetaTag {
    Title { title: String },
    Name { name: String, content: String },
    Property { property: String, content: String },
    Link { rel: String, href: String },
}

impl MetaTag {
    fn name(name: &str, content: impl Into<String>) -> Self {
        MetaTag::Name {
            name: name.to_string(),
            content: content.into(),
        }
    }

    fn property(property: &str, content: impl Into<String>) -> Self {
        MetaTag::Property {
            property: property.to_string(),
            content: content.into(),
        }
    }
}

/// Store-wide fallbacks for page metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaDefaults {
    pub title: String,
    pub description: String,
}

/// Replaces placeholder titles and empty descriptions with `defaults`, and
/// appends the default title when `entries` carries none.
#[must_use]
pub fn apply_meta_defaults(entries: Vec<MetaTag>, defaults: &MetaDefaults) -> Vec<MetaTag> {
    let mut processed: Vec<MetaTag> = entries
        .into_iter()
        .map(|entry| match entry {
            MetaTag::Title { title } if title.contains(BUILDER_PLACEHOLDER_TITLE) => {
                MetaTag::Title {
                    title: defaults.title.clone(),
                }
            }
            MetaTag::Name { name, content } if name == "description" && content.is_empty() => {
                MetaTag::Name {
                    name,
                    content: defaults.description.clone(),
                }
            }
            other => other,
        })
        .collect();

    if !processed.iter().any(|m| matches!(m, MetaTag::Title { .. })) {
        processed.push(MetaTag::Title {
            title: defaults.title.clone(),
        });
    }

    processed
}

/// Builds the metadata for a product page showing `variant`.
///
/// `url` is the page URL; its query string is dropped for the canonical link.
#[must_use]
pub fn product_meta(product: &Product, variant: &Variant, url: &str) -> Vec<MetaTag> {
    let canonical = url.split(['?', '#']).next().unwrap_or(url).to_string();
    let description = product.description.clone().unwrap_or_default();

    let mut entries = vec![
        MetaTag::Title {
            title: product.title.clone(),
        },
        MetaTag::name("description", description.clone()),
        MetaTag::property("og:title", product.title.clone()),
        MetaTag::property("og:type", "product"),
        MetaTag::property("og:url", canonical.clone()),
    ];
    if !description.is_empty() {
        entries.push(MetaTag::property("og:description", description));
    }
    if let Some(price) = &variant.price {
        entries.push(MetaTag::property(
            "product:price:amount",
            price.amount.to_string(),
        ));
        entries.push(MetaTag::property(
            "product:price:currency",
            price.currency_code.clone(),
        ));
    }
    entries.push(MetaTag::Link {
        rel: "canonical".to_string(),
        href: canonical,
    });

    entries
}
