//! Error types for the casegen crate.

/// Authoring-session error types.
///
/// The pure pipeline functions (`normalize`, `diff`, `serialize`) are total
/// and never produce these; only store mutations and the clipboard seam do.
#[derive(Debug, thiserror::Error)]
pub enum AuthorError {
    /// Rename target is empty or whitespace-only.
    #[error("invalid test case name: empty after trimming")]
    InvalidName,

    /// No test case exists with the given id.
    #[error("test case not found: id {id}")]
    NotFound { id: u64 },

    /// The platform clipboard call failed. Swallowed at the session
    /// boundary; the only user-visible effect is the missing success
    /// indicator.
    #[error("clipboard unavailable: {0}")]
    ClipboardUnavailable(String),
}

/// Convenience result type for casegen operations.
pub type AuthorResult<T> = Result<T, AuthorError>;
