//! Pagination error types.

/// Pagination error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PaginationErrorKind {
    /// A session was constructed with no pages. Callers must guarantee at
    /// least one page before opening a session.
    #[display("Page sequence is empty")]
    EmptyPages,
}

/// Pagination error with source location tracking.
///
/// # Examples
///
/// ```
/// use warden_error::{PaginationError, PaginationErrorKind};
///
/// let err = PaginationError::new(PaginationErrorKind::EmptyPages);
/// assert!(format!("{}", err).contains("empty"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pagination Error: {} at line {} in {}", kind, line, file)]
pub struct PaginationError {
    /// The kind of error that occurred
    pub kind: PaginationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PaginationError {
    /// Create a new PaginationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PaginationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
