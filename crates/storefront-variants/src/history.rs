use crate::error::HistoryError;

/// A same-document address: path plus query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Path component, e.g. `/products/dragonfly-lamp`.
    pub path: String,
    /// Query string without the leading `?`; empty when there is none.
    pub search: String,
}

impl Location {
    /// Splits `href` (a path or an absolute URL) into path and query.
    /// Any fragment is dropped.
    #[must_use]
    pub fn parse(href: &str) -> Self {
        let without_fragment = href.split('#').next().unwrap_or(href);
        let (path, search) = without_fragment
            .split_once('?')
            .unwrap_or((without_fragment, ""));
        Self {
            path: path.to_string(),
            search: search.to_string(),
        }
    }

    /// Reassembles the address, omitting `?` when the query is empty.
    #[must_use]
    pub fn href(&self) -> String {
        if self.search.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.search)
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.href())
    }
}

/// The address bar of one page view.
///
/// `replace` swaps the current entry in place; it never adds an entry and
/// never triggers navigation or a reload.
pub trait History {
    fn location(&self) -> Location;

    /// # Errors
    ///
    /// Returns [`HistoryError::Rejected`] when the environment refuses the update.
    fn replace(&mut self, location: &Location) -> Result<(), HistoryError>;
}

/// In-process history holding a single current entry.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    current: Location,
    writes: usize,
    read_only: bool,
}

impl MemoryHistory {
    #[must_use]
    pub fn new(href: &str) -> Self {
        Self {
            current: Location::parse(href),
            writes: 0,
            read_only: false,
        }
    }

    /// A history that rejects every update, as a sandboxed frame would.
    #[must_use]
    pub fn read_only(href: &str) -> Self {
        Self {
            read_only: true,
            ..Self::new(href)
        }
    }

    /// Number of successful in-place updates so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Simulates the user or a link changing the address.
    pub fn navigate(&mut self, href: &str) {
        self.current = Location::parse(href);
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Location {
        self.current.clone()
    }

    fn replace(&mut self, location: &Location) -> Result<(), HistoryError> {
        if self.read_only {
            return Err(HistoryError::Rejected {
                href: location.href(),
                reason: "history is read-only".to_string(),
            });
        }
        self.current = location.clone();
        self.writes += 1;
        Ok(())
    }
}
