use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A purchasable catalog item with its declared options and variants, as
/// returned by the commerce backend for a single handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Opaque backend identifier, e.g. `"gid://shopify/Product/8123456789"`.
    pub id: String,
    /// Human-readable URL slug, e.g. `"dragonfly-tiffany-table-lamp"`.
    pub handle: String,
    pub title: String,
    /// Plain-text description used for page metadata.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Axes of variation in display order. This order is also the order of
    /// option pairs in a synchronized query string.
    #[serde(default)]
    pub options: Vec<ProductOption>,
    /// Variants in declaration order.
    pub variants: Vec<Variant>,
}

impl Product {
    /// Returns `true` if at least one variant is currently available for purchase.
    #[must_use]
    pub fn has_available_variants(&self) -> bool {
        self.variants.iter().any(|v| v.available)
    }

    /// Returns the first variant flagged available, in declaration order.
    #[must_use]
    pub fn first_available_variant(&self) -> Option<&Variant> {
        self.variants.iter().find(|v| v.available)
    }

    /// Returns the variant shown on an unparameterized visit: the first
    /// available variant, else the first variant. `None` only when the
    /// product has no variants at all.
    #[must_use]
    pub fn default_variant(&self) -> Option<&Variant> {
        self.first_available_variant()
            .or_else(|| self.variants.first())
    }

    /// Returns `true` when the product stands in for several catalog items
    /// merged into one listing, marked by `tag` in its tags.
    #[must_use]
    pub fn is_combined_listing(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Returns the declared option names in order.
    pub fn option_names(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|o| o.name.as_str())
    }

    /// Returns `true` if `name` is a declared option of this product.
    #[must_use]
    pub fn has_option(&self, name: &str) -> bool {
        self.options.iter().any(|o| o.name == name)
    }

    /// Checks the catalog item invariants: at least one variant, unique
    /// option names, every variant complete against the declared options,
    /// and no two variants sharing a combination.
    ///
    /// # Errors
    ///
    /// Returns the first [`CoreError`] found.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.variants.is_empty() {
            return Err(CoreError::NoVariants {
                handle: self.handle.clone(),
            });
        }

        let mut declared: HashMap<&str, &ProductOption> = HashMap::new();
        for option in &self.options {
            if declared.insert(option.name.as_str(), option).is_some() {
                return Err(CoreError::DuplicateOption {
                    handle: self.handle.clone(),
                    option: option.name.clone(),
                });
            }
        }

        let mut seen: HashMap<Vec<&str>, &str> = HashMap::new();
        for variant in &self.variants {
            let incomplete = |reason: String| CoreError::IncompleteVariant {
                handle: self.handle.clone(),
                variant_id: variant.id.clone(),
                reason,
            };

            let mut named = HashSet::new();
            for selected in &variant.selected_options {
                let Some(option) = declared.get(selected.name.as_str()) else {
                    return Err(incomplete(format!(
                        "option '{}' is not declared on the product",
                        selected.name
                    )));
                };
                if !named.insert(selected.name.as_str()) {
                    return Err(incomplete(format!(
                        "option '{}' is selected more than once",
                        selected.name
                    )));
                }
                if !option.values.is_empty() && !option.values.contains(&selected.value) {
                    return Err(incomplete(format!(
                        "value '{}' is not a declared value of option '{}'",
                        selected.value, selected.name
                    )));
                }
            }
            if let Some(missing) = self.option_names().find(|name| !named.contains(name)) {
                return Err(incomplete(format!("no value for option '{missing}'")));
            }

            let combination: Vec<&str> = self
                .option_names()
                .filter_map(|name| variant.value_of(name))
                .collect();
            if let Some(first) = seen.insert(combination, variant.id.as_str()) {
                return Err(CoreError::DuplicateCombination {
                    handle: self.handle.clone(),
                    first: first.to_string(),
                    second: variant.id.clone(),
                });
            }
        }

        Ok(())
    }
}

/// A named axis of variation, e.g. `Color` with values `Red`, `Blue`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// One (option name → value) pair of a variant or a selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

impl SelectedOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A monetary amount with its ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal amount, serialized as a string (e.g. `"289.00"`).
    pub amount: Decimal,
    pub currency_code: String,
}

/// One fully specified combination of option values of a [`Product`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Opaque, stable identifier.
    pub id: String,
    /// Display title, usually the option values joined, e.g. `"Red / Large"`.
    pub title: String,
    /// Whether the variant is in stock and orderable.
    /// Defaults to `true` when absent.
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub price: Option<Money>,
    #[serde(default)]
    pub compare_at_price: Option<Money>,
    /// Handle of the standalone product this variant stands for when it
    /// belongs to a combined listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_handle: Option<String>,
    /// Option values in the product's declared option order.
    pub selected_options: Vec<SelectedOption>,
}

impl Variant {
    /// Returns this variant's value for option `name`.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.selected_options
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.value.as_str())
    }
}

fn default_available() -> bool {
    true
}
