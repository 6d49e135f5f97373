use serde::Serialize;
use storefront_core::{Product, Variant};

/// "Product viewed" event payload published for the resolved variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductView {
    pub products: Vec<ViewedProduct>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewedProduct {
    pub id: String,
    pub title: String,
    /// Variant price amount as a decimal string; `"0"` when unpriced.
    pub price: String,
    pub vendor: String,
    pub variant_id: String,
    pub variant_title: String,
    pub quantity: u32,
}

impl ProductView {
    #[must_use]
    pub fn from_resolved(product: &Product, variant: &Variant) -> Self {
        Self {
            products: vec![ViewedProduct {
                id: product.id.clone(),
                title: product.title.clone(),
                price: variant
                    .price
                    .as_ref()
                    .map_or_else(|| "0".to_string(), |p| p.amount.to_string()),
                vendor: product.vendor.clone().unwrap_or_default(),
                variant_id: variant.id.clone(),
                variant_title: variant.title.clone(),
                quantity: 1,
            }],
        }
    }
}
