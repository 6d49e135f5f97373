//! One product page view: resolution on mount, on option clicks, and on
//! external address changes, each followed by URL synchronization.

use storefront_core::{Product, SelectedOption, TieBreak, Variant};

use crate::error::ResolveError;
use crate::history::History;
use crate::resolver::{resolve, resolve_pinned};
use crate::selection::SelectionState;
use crate::sync::{SyncOutcome, SyncState, UrlSynchronizer};

pub struct PageView<'p, H: History> {
    product: &'p Product,
    history: H,
    synchronizer: UrlSynchronizer,
    tie_break: TieBreak,
    resolved: &'p Variant,
}

impl<'p, H: History> PageView<'p, H> {
    /// Mounts the page: reads the selection from `history`, resolves it and
    /// synchronizes the address.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NoVariants`] when the product has no variants.
    pub fn open(
        product: &'p Product,
        history: H,
        tie_break: TieBreak,
        combined_listing_tag: &str,
    ) -> Result<(Self, SyncOutcome), ResolveError> {
        let selection = SelectionState::from_query(&history.location().search, product);
        let resolved = resolve(product, &selection, tie_break)?;
        let mut page = Self {
            product,
            history,
            synchronizer: UrlSynchronizer::new(combined_listing_tag),
            tie_break,
            resolved,
        };
        let outcome = page.commit(resolved);
        Ok((page, outcome))
    }

    /// The user picked `value` for option `name`. The other options keep
    /// the currently resolved variant's values where a variant with the
    /// picked value allows it.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NoVariants`] when the product has no variants.
    pub fn select_option(&mut self, name: &str, value: &str) -> Result<SyncOutcome, ResolveError> {
        let selection = SelectionState::of_variant(self.resolved).with(name, value);
        let selection = SelectionState::from_pairs(selection.pairs().iter().cloned(), self.product);
        let picked = SelectedOption::new(name, value);
        let resolved = resolve_pinned(self.product, &selection, &picked, self.tie_break)?;
        Ok(self.commit(resolved))
    }

    /// The address changed outside the page (back/forward within the same
    /// document, a pasted link). Recomputes the selection from the new URL.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NoVariants`] when the product has no variants.
    pub fn location_changed(&mut self) -> Result<SyncOutcome, ResolveError> {
        let selection =
            SelectionState::from_query(&self.history.location().search, self.product);
        let resolved = resolve(self.product, &selection, self.tie_break)?;
        Ok(self.commit(resolved))
    }

    /// The displayed variant is updated first; the address follows.
    fn commit(&mut self, resolved: &'p Variant) -> SyncOutcome {
        self.resolved = resolved;
        self.synchronizer
            .sync(self.product, self.resolved, &mut self.history)
    }

    #[must_use]
    pub fn resolved(&self) -> &'p Variant {
        self.resolved
    }

    #[must_use]
    pub fn product(&self) -> &'p Product {
        self.product
    }

    #[must_use]
    pub fn sync_state(&self) -> SyncState {
        self.synchronizer.state()
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    /// Ends the page view, handing back the history.
    pub fn into_history(self) -> H {
        self.history
    }
}
