//! Keeps the address bar's query string in step with the resolved variant.

use storefront_core::{Product, Variant};

use crate::history::{History, Location};
use crate::query::{encode_query, parse_query};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// The URL does not (yet) encode the resolved variant.
    Unsynchronized,
    /// The URL encodes exactly the resolved variant's options.
    Synchronized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Combined listings own their navigation; nothing was written.
    Suppressed,
    /// The URL already matched; nothing was written.
    AlreadySynchronized,
    /// The current history entry was replaced with this location.
    Rewritten(Location),
    /// The environment refused the update. The page still shows the
    /// resolved variant; only the address is stale.
    WriteFailed,
}

impl SyncOutcome {
    /// Stable snake_case name, as reported to API and CLI clients.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            SyncOutcome::Suppressed => "suppressed",
            SyncOutcome::AlreadySynchronized => "already_synchronized",
            SyncOutcome::Rewritten(_) => "rewritten",
            SyncOutcome::WriteFailed => "write_failed",
        }
    }
}

/// Rewrites the current history entry when the resolved variant's options
/// differ from what the query string encodes, or when the query string is
/// empty.
#[derive(Debug, Clone)]
pub struct UrlSynchronizer {
    state: SyncState,
    combined_listing_tag: String,
}

impl UrlSynchronizer {
    pub fn new(combined_listing_tag: impl Into<String>) -> Self {
        Self {
            state: SyncState::Unsynchronized,
            combined_listing_tag: combined_listing_tag.into(),
        }
    }

    #[must_use]
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Brings `history` in line with `variant`.
    ///
    /// Never fails: a rejected update is logged and reported as
    /// [`SyncOutcome::WriteFailed`], leaving the state unsynchronized so the
    /// next call tries again.
    pub fn sync<H>(&mut self, product: &Product, variant: &Variant, history: &mut H) -> SyncOutcome
    where
        H: History + ?Sized,
    {
        if product.is_combined_listing(&self.combined_listing_tag) {
            return SyncOutcome::Suppressed;
        }

        let current = history.location();
        if !needs_update(&current.search, variant) {
            self.state = SyncState::Synchronized;
            return SyncOutcome::AlreadySynchronized;
        }

        let search = synchronized_search(&current.search, product, variant);
        if search == current.search {
            self.state = SyncState::Synchronized;
            return SyncOutcome::AlreadySynchronized;
        }

        let next = Location {
            path: current.path,
            search,
        };
        match history.replace(&next) {
            Ok(()) => {
                tracing::debug!(
                    handle = %product.handle,
                    variant_id = %variant.id,
                    href = %next,
                    "replaced history entry with resolved variant"
                );
                self.state = SyncState::Synchronized;
                SyncOutcome::Rewritten(next)
            }
            Err(e) => {
                tracing::warn!(
                    handle = %product.handle,
                    variant_id = %variant.id,
                    error = %e,
                    "could not update address for resolved variant"
                );
                self.state = SyncState::Unsynchronized;
                SyncOutcome::WriteFailed
            }
        }
    }
}

/// An empty query always needs normalizing; otherwise any option whose
/// first value in the query differs from the variant's value does.
fn needs_update(search: &str, variant: &Variant) -> bool {
    if search.is_empty() {
        return true;
    }
    let params = parse_query(search);
    variant.selected_options.iter().any(|option| {
        params
            .iter()
            .find(|(k, _)| *k == option.name)
            .map(|(_, v)| v.as_str())
            != Some(option.value.as_str())
    })
}

/// One pair per declared option in declared order, then every unrelated
/// parameter already present, in its original order.
fn synchronized_search(search: &str, product: &Product, variant: &Variant) -> String {
    let mut pairs: Vec<(String, String)> = product
        .options
        .iter()
        .filter_map(|option| {
            variant
                .value_of(&option.name)
                .map(|value| (option.name.clone(), value.to_string()))
        })
        .collect();
    pairs.extend(
        parse_query(search)
            .into_iter()
            .filter(|(k, _)| !product.has_option(k)),
    );
    encode_query(&pairs)
}

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;
