//! Database error types.

/// Database error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum DatabaseErrorKind {
    /// The store cannot be reached (connection failure, pool exhaustion,
    /// operation deadline expired). Transient: surfaced to the caller and
    /// never silently retried.
    #[display("Store unavailable: {}", _0)]
    Unavailable(String),
    /// A unique constraint rejected an insert. The write coordinator
    /// swallows this for parent-record inserts and re-derives cache state;
    /// everywhere else it surfaces.
    #[display("Duplicate key: {}", _0)]
    DuplicateKey(String),
    /// A constraint other than a unique key rejected the statement.
    #[display("Constraint violation: {}", _0)]
    Constraint(String),
    /// Query execution failed
    #[display("Database query error: {}", _0)]
    Query(String),
    /// Record not found
    #[display("Record not found")]
    NotFound,
    /// Row data did not decode into the expected domain type
    #[display("Serialization error: {}", _0)]
    Serialization(String),
}

/// Database error with source location tracking.
///
/// # Examples
///
/// ```
/// use warden_error::{DatabaseError, DatabaseErrorKind};
///
/// let err = DatabaseError::new(DatabaseErrorKind::NotFound);
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Database Error: {} at line {} in {}", kind, line, file)]
pub struct DatabaseError {
    /// The kind of error that occurred
    pub kind: DatabaseErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DatabaseError {
    /// Create a new DatabaseError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DatabaseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether this error is a unique-key rejection.
    ///
    /// The cascading write path uses this to distinguish "a concurrent
    /// cascade won the insert race" from genuine failures.
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self.kind, DatabaseErrorKind::DuplicateKey(_))
    }
}

impl From<diesel::result::Error> for DatabaseError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind as DieselKind, Error};
        match err {
            Error::NotFound => DatabaseError::new(DatabaseErrorKind::NotFound),
            Error::DatabaseError(DieselKind::UniqueViolation, info) => DatabaseError::new(
                DatabaseErrorKind::DuplicateKey(info.message().to_string()),
            ),
            Error::DatabaseError(DieselKind::ForeignKeyViolation, info)
            | Error::DatabaseError(DieselKind::NotNullViolation, info)
            | Error::DatabaseError(DieselKind::CheckViolation, info) => {
                DatabaseError::new(DatabaseErrorKind::Constraint(info.message().to_string()))
            }
            Error::DatabaseError(DieselKind::ClosedConnection, info) => {
                DatabaseError::new(DatabaseErrorKind::Unavailable(info.message().to_string()))
            }
            _ => DatabaseError::new(DatabaseErrorKind::Query(err.to_string())),
        }
    }
}

impl From<diesel::ConnectionError> for DatabaseError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        DatabaseError::new(DatabaseErrorKind::Unavailable(err.to_string()))
    }
}
