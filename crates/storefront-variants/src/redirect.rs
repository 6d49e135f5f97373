//! Address corrections decided before a page view opens. A redirect
//! replaces the whole page, so no variant is resolved or synchronized for
//! the requested address.

use storefront_core::{Product, TieBreak};

use crate::history::Location;
use crate::query::{encode_query, parse_query};
use crate::resolver::resolve;
use crate::selection::SelectionState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRedirect {
    /// The product was requested under a handle other than its own, e.g. a
    /// translated or differently cased one.
    LocalizedHandle(Location),
    /// A combined listing forwards to the product behind its selected
    /// variant, with every option of that variant in the query.
    CombinedListing(Location),
}

impl PageRedirect {
    #[must_use]
    pub fn location(&self) -> &Location {
        match self {
            Self::LocalizedHandle(location) | Self::CombinedListing(location) => location,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::LocalizedHandle(_) => "localized_handle",
            Self::CombinedListing(_) => "combined_listing",
        }
    }
}

/// When combined listings forward to one of their products.
#[derive(Debug, Clone, Copy)]
pub struct RedirectPolicy<'a> {
    pub combined_listing_tag: &'a str,
    /// Off by default: combined listings are shown in place.
    pub redirect_combined_listings: bool,
    pub tie_break: TieBreak,
}

/// Decides whether `requested` must be replaced before `product` is shown.
///
/// The last path segment of `requested` is the handle the product was
/// looked up by. A handle mismatch wins over the combined-listing rule.
#[must_use]
pub fn page_redirect(
    requested: &Location,
    product: &Product,
    policy: &RedirectPolicy<'_>,
) -> Option<PageRedirect> {
    let requested_handle = last_segment(&requested.path);
    if requested_handle != product.handle {
        let next = Location {
            path: with_handle(&requested.path, &product.handle),
            search: requested.search.clone(),
        };
        tracing::debug!(
            requested = requested_handle,
            handle = %product.handle,
            href = %next,
            "redirecting to the product's own handle"
        );
        return Some(PageRedirect::LocalizedHandle(next));
    }

    if !policy.redirect_combined_listings
        || !product.is_combined_listing(policy.combined_listing_tag)
    {
        return None;
    }

    let selection = SelectionState::from_query(&requested.search, product);
    let variant = resolve(product, &selection, policy.tie_break).ok()?;
    let target = variant.product_handle.as_deref().unwrap_or(&product.handle);

    let mut params = parse_query(&requested.search);
    for option in &variant.selected_options {
        if !params.iter().any(|(k, _)| *k == option.name) {
            params.push((option.name.clone(), option.value.clone()));
        }
    }
    let next = Location {
        path: with_handle(&requested.path, target),
        search: encode_query(&params),
    };
    if next.path == requested.path && parse_query(&next.search) == parse_query(&requested.search)
    {
        return None;
    }

    tracing::debug!(
        handle = %product.handle,
        variant_id = %variant.id,
        href = %next,
        "redirecting combined listing to its selected product"
    );
    Some(PageRedirect::CombinedListing(next))
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn with_handle(path: &str, handle: &str) -> String {
    match path.rsplit_once('/') {
        Some((prefix, _)) => format!("{prefix}/{handle}"),
        None => handle.to_string(),
    }
}
