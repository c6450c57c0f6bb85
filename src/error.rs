use thiserror::Error;

/// Constraint classes reported by the store.
///
/// Mapped from the Postgres SQLSTATE class 23 codes so callers can tell a
/// duplicate email from a dangling foreign key without parsing driver
/// messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    NotNull,
    ForeignKey,
    Unique,
    Check,
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintKind::NotNull => write!(f, "not-null"),
            ConstraintKind::ForeignKey => write!(f, "foreign key"),
            ConstraintKind::Unique => write!(f, "unique"),
            ConstraintKind::Check => write!(f, "check"),
        }
    }
}

/// Represent errors in the application
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing or malformed connection parameter. Raised before any store
    /// contact is attempted.
    #[error("configuration error: {0}")]
    Config(String),

    /// The store is unreachable or rejected authentication. Never retried.
    #[error("database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    /// A table declaration is malformed, e.g. a foreign key pointing at an
    /// undeclared table.
    #[error("invalid schema definition: {0}")]
    SchemaDefinition(String),

    /// A write violated a declared constraint.
    #[error("{kind} constraint violated: {message}")]
    Constraint {
        kind: ConstraintKind,
        message: String,
    },

    /// A value was rejected at the application boundary before any SQL was
    /// issued, e.g. an oversized image payload.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("entity not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

/// Helper for `ServiceError` result
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let kind = match db_err.code().as_deref() {
                Some("23502") => Some(ConstraintKind::NotNull),
                Some("23503") => Some(ConstraintKind::ForeignKey),
                Some("23505") => Some(ConstraintKind::Unique),
                Some("23514") => Some(ConstraintKind::Check),
                _ => None,
            };
            if let Some(kind) = kind {
                return ServiceError::Constraint {
                    kind,
                    message: db_err.message().to_string(),
                };
            }
        }
        ServiceError::Database(err)
    }
}
