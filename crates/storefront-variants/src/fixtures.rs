//! Catalog items shared by the unit tests.

use rust_decimal::Decimal;
use storefront_core::{Money, Product, ProductOption, SelectedOption, Variant};

pub(crate) fn variant(id: &str, available: bool, pairs: &[(&str, &str)]) -> Variant {
    Variant {
        id: id.to_string(),
        title: pairs
            .iter()
            .map(|(_, v)| *v)
            .collect::<Vec<_>>()
            .join(" / "),
        available,
        price: Some(Money {
            amount: Decimal::new(28_900, 2),
            currency_code: "USD".to_string(),
        }),
        compare_at_price: None,
        product_handle: None,
        selected_options: pairs
            .iter()
            .map(|(n, v)| SelectedOption::new(*n, *v))
            .collect(),
    }
}

fn option(name: &str, values: &[&str]) -> ProductOption {
    ProductOption {
        name: name.to_string(),
        values: values.iter().map(ToString::to_string).collect(),
    }
}

pub(crate) fn product(options: Vec<ProductOption>, variants: Vec<Variant>) -> Product {
    Product {
        id: "gid://shopify/Product/1".to_string(),
        handle: "dragonfly-lamp".to_string(),
        title: "Dragonfly Lamp".to_string(),
        description: None,
        vendor: Some("Entropy Bright".to_string()),
        tags: vec![],
        options,
        variants,
    }
}

/// `Color: [Red, Blue]`, both variants available.
pub(crate) fn color_product() -> Product {
    product(
        vec![option("Color", &["Red", "Blue"])],
        vec![
            variant("v1", true, &[("Color", "Red")]),
            variant("v2", true, &[("Color", "Blue")]),
        ],
    )
}

/// `Color: [Red, Blue] x Size: [S, M]` in declaration order
/// Red/S, Red/M, Blue/S, Blue/M, all available.
pub(crate) fn color_size_product() -> Product {
    product(
        vec![option("Color", &["Red", "Blue"]), option("Size", &["S", "M"])],
        vec![
            variant("red-s", true, &[("Color", "Red"), ("Size", "S")]),
            variant("red-m", true, &[("Color", "Red"), ("Size", "M")]),
            variant("blue-s", true, &[("Color", "Blue"), ("Size", "S")]),
            variant("blue-m", true, &[("Color", "Blue"), ("Size", "M")]),
        ],
    )
}
