use storefront_core::{Product, SelectedOption, Variant};

use crate::query::parse_query;

/// The chosen value per option, reconstructed from the current URL.
///
/// Only query keys that exactly equal a declared option name take part;
/// matching is case-sensitive. When a key repeats, its first value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pairs: Vec<SelectedOption>,
}

impl SelectionState {
    /// Reads the selection for `product` from a query string (leading `?`
    /// optional).
    #[must_use]
    pub fn from_query(query: &str, product: &Product) -> Self {
        Self::from_pairs(
            parse_query(query)
                .into_iter()
                .map(|(name, value)| SelectedOption { name, value }),
            product,
        )
    }

    /// Builds a selection from explicit pairs, keeping declared options only.
    pub fn from_pairs<I>(pairs: I, product: &Product) -> Self
    where
        I: IntoIterator<Item = SelectedOption>,
    {
        let mut kept: Vec<SelectedOption> = Vec::new();
        for pair in pairs {
            if product.has_option(&pair.name) && !kept.iter().any(|p| p.name == pair.name) {
                kept.push(pair);
            }
        }
        Self { pairs: kept }
    }

    /// The selection that exactly describes `variant`.
    #[must_use]
    pub fn of_variant(variant: &Variant) -> Self {
        Self {
            pairs: variant.selected_options.clone(),
        }
    }

    /// Returns `true` for a fresh, unparameterized visit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    pub fn pairs(&self) -> &[SelectedOption] {
        &self.pairs
    }

    /// Returns a copy with option `name` set to `value`, replacing any
    /// earlier value for that option.
    #[must_use]
    pub fn with(&self, name: &str, value: &str) -> Self {
        let mut pairs = self.pairs.clone();
        match pairs.iter_mut().find(|p| p.name == name) {
            Some(existing) => value.clone_into(&mut existing.value),
            None => pairs.push(SelectedOption::new(name, value)),
        }
        Self { pairs }
    }

    /// Number of selected options whose value equals `variant`'s value.
    #[must_use]
    pub fn overlap(&self, variant: &Variant) -> usize {
        self.pairs
            .iter()
            .filter(|p| variant.value_of(&p.name) == Some(p.value.as_str()))
            .count()
    }

    /// Returns `true` when the selection names exactly `variant`'s option
    /// values, no more and no fewer.
    #[must_use]
    pub fn exactly_matches(&self, variant: &Variant) -> bool {
        self.pairs.len() == variant.selected_options.len() && self.overlap(variant) == self.pairs.len()
    }
}
