//! Course catalog error types.

/// Catalog client error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum CatalogErrorKind {
    /// Transport-level failure talking to the catalog API
    #[display("Catalog request failed: {}", _0)]
    Http(String),
    /// The API answered with a non-success status code
    #[display("Catalog API returned status {}", _0)]
    Status(u16),
    /// The response body was not valid JSON
    #[display("Catalog response decode error: {}", _0)]
    Json(String),
    /// The response parsed but did not match the expected schema
    #[display("Unexpected catalog response shape: {}", _0)]
    UnexpectedSchema(String),
    /// The query was rejected before sending (missing term, no filter)
    #[display("Invalid catalog query: {}", _0)]
    InvalidQuery(String),
}

/// Catalog error with source location tracking.
///
/// # Examples
///
/// ```
/// use warden_error::{CatalogError, CatalogErrorKind};
///
/// let err = CatalogError::new(CatalogErrorKind::Status(503));
/// assert!(format!("{}", err).contains("503"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Catalog Error: {} at line {} in {}", kind, line, file)]
pub struct CatalogError {
    /// The kind of error that occurred
    pub kind: CatalogErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CatalogError {
    /// Create a new CatalogError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CatalogErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
