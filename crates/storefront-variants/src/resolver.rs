//! Resolution of a (possibly partial or stale) selection to one variant.

use storefront_core::{Product, SelectedOption, TieBreak, Variant};

use crate::error::ResolveError;
use crate::selection::SelectionState;

/// Picks the single variant to display for `selection`.
///
/// 1. A selection that exactly names one variant's option values resolves
///    to that variant.
/// 2. An empty selection resolves to the first available variant, or the
///    first variant when none is available.
/// 3. Otherwise the variant matching the most selected options wins, ties
///    settled by `tie_break`. With no overlap at all, rule 2 applies.
///
/// The result depends only on the arguments.
///
/// # Errors
///
/// Returns [`ResolveError::NoVariants`] when the product has no variants.
pub fn resolve<'p>(
    product: &'p Product,
    selection: &SelectionState,
    tie_break: TieBreak,
) -> Result<&'p Variant, ResolveError> {
    let default = product
        .default_variant()
        .ok_or_else(|| ResolveError::NoVariants {
            handle: product.handle.clone(),
        })?;

    if selection.is_empty() {
        return Ok(default);
    }

    if let Some(exact) = product
        .variants
        .iter()
        .find(|v| selection.exactly_matches(v))
    {
        return Ok(exact);
    }

    let best = closest(product.variants.iter(), selection, tie_break);

    match best {
        Some((variant, score)) => {
            tracing::debug!(
                handle = %product.handle,
                variant_id = %variant.id,
                matched = score,
                selected = selection.len(),
                "no exact variant match; using closest partial match"
            );
            Ok(variant)
        }
        None => {
            tracing::debug!(
                handle = %product.handle,
                variant_id = %default.id,
                "selection matches no variant; using default variant"
            );
            Ok(default)
        }
    }
}

/// Resolves `selection` after the user picked `pinned`, considering only
/// variants that carry the picked value so the choice is never discarded.
///
/// Among those, an exact match wins, then the closest match to the rest of
/// the selection under `tie_break`. When no variant carries the picked value
/// this is plain [`resolve`].
///
/// # Errors
///
/// Returns [`ResolveError::NoVariants`] when the product has no variants.
pub fn resolve_pinned<'p>(
    product: &'p Product,
    selection: &SelectionState,
    pinned: &SelectedOption,
    tie_break: TieBreak,
) -> Result<&'p Variant, ResolveError> {
    let carries_pinned =
        |v: &&'p Variant| v.value_of(&pinned.name) == Some(pinned.value.as_str());

    if let Some(exact) = product
        .variants
        .iter()
        .filter(carries_pinned)
        .find(|v| selection.exactly_matches(v))
    {
        return Ok(exact);
    }

    match closest(product.variants.iter().filter(carries_pinned), selection, tie_break) {
        Some((variant, score)) => {
            tracing::debug!(
                handle = %product.handle,
                variant_id = %variant.id,
                option = %pinned.name,
                value = %pinned.value,
                matched = score,
                "picked value has no exact variant; using closest variant carrying it"
            );
            Ok(variant)
        }
        None => resolve(product, selection, tie_break),
    }
}

/// The candidate overlapping `selection` on the most options, ties settled
/// by `tie_break`. Candidates with zero overlap never win.
fn closest<'p, I>(
    candidates: I,
    selection: &SelectionState,
    tie_break: TieBreak,
) -> Option<(&'p Variant, usize)>
where
    I: IntoIterator<Item = &'p Variant>,
{
    let mut best: Option<(&Variant, usize)> = None;
    for variant in candidates {
        let score = selection.overlap(variant);
        if score == 0 {
            continue;
        }
        let better = match best {
            None => true,
            Some((current, current_score)) => {
                score > current_score
                    || (score == current_score
                        && tie_break == TieBreak::PreferAvailable
                        && variant.available
                        && !current.available)
            }
        };
        if better {
            best = Some((variant, score));
        }
    }
    best
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
