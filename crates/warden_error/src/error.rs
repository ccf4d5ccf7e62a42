//! Top-level error wrapper types.

use crate::{CatalogError, ConfigError, PaginationError};
#[cfg(feature = "database")]
use crate::DatabaseError;

/// Union of the error domains in the Warden workspace.
///
/// # Examples
///
/// ```
/// use warden_error::{WardenError, ConfigError};
///
/// let cfg_err = ConfigError::new("missing token");
/// let err: WardenError = cfg_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum WardenErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Course catalog client error
    #[from(CatalogError)]
    Catalog(CatalogError),
    /// Pagination session error
    #[from(PaginationError)]
    Pagination(PaginationError),
    /// Database error
    #[cfg(feature = "database")]
    #[from(DatabaseError)]
    Database(DatabaseError),
}

/// Warden error with kind discrimination.
///
/// # Examples
///
/// ```
/// use warden_error::{WardenResult, ConfigError};
///
/// fn might_fail() -> WardenResult<()> {
///     Err(ConfigError::new("missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("success"),
///     Err(e) => println!("error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Warden Error: {}", _0)]
pub struct WardenError(Box<WardenErrorKind>);

impl WardenError {
    /// Create a new error from a kind.
    pub fn new(kind: WardenErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &WardenErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to WardenErrorKind
impl<T> From<T> for WardenError
where
    T: Into<WardenErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Warden operations.
pub type WardenResult<T> = std::result::Result<T, WardenError>;
