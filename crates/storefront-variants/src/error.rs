use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A catalog item must expose at least one variant; an empty one is a
    /// configuration error on the commerce side.
    #[error("product '{handle}' has no variants to resolve")]
    NoVariants { handle: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("history update rejected for {href}: {reason}")]
    Rejected { href: String, reason: String },
}
