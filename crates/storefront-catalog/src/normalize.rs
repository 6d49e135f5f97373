//! Normalization from raw Shopify types to [`storefront_core::Product`].

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use storefront_core::{Money, Product, ProductOption, SelectedOption, Variant};

use crate::error::CatalogError;
use crate::types::{ShopifyOption, ShopifyProduct, ShopifyVariant};

/// The public endpoint omits the shop currency.
const STORE_CURRENCY: &str = "USD";

/// Shopify stores at most three option axes per product.
const MAX_OPTIONS: usize = 3;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid HTML tag regex"));

/// Normalizes a raw [`ShopifyProduct`] into a validated [`Product`].
///
/// # Errors
///
/// - [`CatalogError::Normalization`] when the option layout cannot be mapped
///   (more than three options, a variant missing a positional value, or an
///   unparseable price).
/// - [`CatalogError::InvalidProduct`] when the result breaks a catalog item
///   invariant, including having no variants.
pub fn normalize_product(product: ShopifyProduct) -> Result<Product, CatalogError> {
    let source_product_id = product.id.to_string();
    let normalization = |reason: String| CatalogError::Normalization {
        source_product_id: source_product_id.clone(),
        reason,
    };

    if product.options.len() > MAX_OPTIONS {
        return Err(normalization(format!(
            "{} options declared, at most {MAX_OPTIONS} supported",
            product.options.len()
        )));
    }

    let positioned = positioned_options(product.options);

    let variants = product
        .variants
        .into_iter()
        .map(|variant| normalize_variant(variant, &positioned).map_err(&normalization))
        .collect::<Result<Vec<_>, _>>()?;

    let normalized = Product {
        id: format!("gid://shopify/Product/{}", product.id),
        handle: product.handle,
        title: product.title,
        description: product.body_html.as_deref().and_then(plain_text),
        vendor: product.vendor.filter(|v| !v.trim().is_empty()),
        tags: product.tags,
        options: positioned.into_iter().map(|(_, option)| option).collect(),
        variants,
    };
    normalized.validate()?;
    Ok(normalized)
}

/// Pairs each option with the 1-based position its values occupy in
/// `option1..option3`, sorted by that position.
fn positioned_options(options: Vec<ShopifyOption>) -> Vec<(usize, ProductOption)> {
    let mut positioned: Vec<(usize, ProductOption)> = options
        .into_iter()
        .enumerate()
        .map(|(idx, option)| {
            let position = option
                .position
                .and_then(|p| usize::try_from(p).ok())
                .filter(|p| *p >= 1)
                .unwrap_or(idx + 1);
            (
                position,
                ProductOption {
                    name: option.name,
                    values: option.values,
                },
            )
        })
        .collect();
    positioned.sort_by_key(|(position, _)| *position);
    positioned
}

fn normalize_variant(
    variant: ShopifyVariant,
    options: &[(usize, ProductOption)],
) -> Result<Variant, String> {
    let selected_options = options
        .iter()
        .map(|(position, option)| {
            variant
                .option_value(*position)
                .map(|value| SelectedOption::new(&option.name, value))
                .ok_or_else(|| {
                    format!(
                        "variant {} has no option{position} value for '{}'",
                        variant.id, option.name
                    )
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Variant {
        id: format!("gid://shopify/ProductVariant/{}", variant.id),
        price: parse_money(variant.price.as_deref(), variant.id)?,
        compare_at_price: parse_money(variant.compare_at_price.as_deref(), variant.id)?,
        title: variant.title,
        available: variant.available,
        product_handle: None,
        selected_options,
    })
}

/// Empty strings are treated as absent prices.
fn parse_money(raw: Option<&str>, variant_id: i64) -> Result<Option<Money>, String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let amount = Decimal::from_str(raw)
        .map_err(|e| format!("variant {variant_id} has unparseable price \"{raw}\": {e}"))?;
    Ok(Some(Money {
        amount,
        currency_code: STORE_CURRENCY.to_string(),
    }))
}

/// Strips markup and collapses whitespace. `None` when nothing is left.
fn plain_text(html: &str) -> Option<String> {
    let stripped = TAG_RE.replace_all(html, " ");
    let text = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
