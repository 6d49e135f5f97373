//! Variant selection for product pages.
//!
//! The browser URL is the only carrier of the current selection. A page view
//! reads the selection from the query string, resolves it to one variant of
//! the product, and writes the resolved variant's options back to the query
//! string with an in-place history update.

pub mod analytics;
pub mod error;
pub mod history;
pub mod page;
pub mod query;
pub mod redirect;
pub mod resolver;
pub mod selection;
pub mod sync;

pub use analytics::{ProductView, ViewedProduct};
pub use error::{HistoryError, ResolveError};
pub use history::{History, Location, MemoryHistory};
pub use page::PageView;
pub use redirect::{page_redirect, PageRedirect, RedirectPolicy};
pub use resolver::{resolve, resolve_pinned};
pub use selection::SelectionState;
pub use sync::{SyncOutcome, SyncState, UrlSynchronizer};

#[cfg(test)]
pub(crate) mod fixtures;
