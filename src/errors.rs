//! Error types for gridiron operations.
//!
//! Errors are layered: the repository reports [`DataStoreError`], the validation engine
//! reports [`ValidationError`](crate::ValidationError), and the service layer folds both
//! into [`ServiceError`], which is the only error the HTTP layer sees.

use crate::validate::ValidationError;

/// Errors that can occur during data store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataStoreError {
    /// The requested row was not found in the data store.
    #[error("item not found in data store")]
    NotFound,
    /// A row violating a uniqueness constraint already exists.
    #[error("item already exists in data store")]
    AlreadyExists,
    /// A foreign key constraint rejected the statement.
    #[error("foreign key constraint violated")]
    ForeignKeyViolation,
    /// An internal storage system error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for DataStoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => DataStoreError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DataStoreError::AlreadyExists
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                DataStoreError::ForeignKeyViolation
            }
            _ => DataStoreError::Internal(e.to_string()),
        }
    }
}

/// Errors returned by the service layer.
///
/// Each variant corresponds to one outcome class a caller can act on; the HTTP layer maps
/// them to status codes without inspecting the message text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// A field value or identifier is malformed or out of range.
    #[error("{0}")]
    InvalidArgument(String),
    /// The target or a referenced entity does not exist.
    #[error("{entity} with ID {id} not found")]
    NotFound {
        /// Human-readable entity type, e.g. "team" or "home team".
        entity: &'static str,
        /// The identifier that failed to resolve.
        id: i64,
    },
    /// A uniqueness constraint or write-time invariant was violated.
    #[error("{0}")]
    Conflict(String),
    /// An update request carried no fields.
    #[error("at least one field must be provided for update")]
    NoFieldsProvided,
    /// A storage failure unrelated to validation.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Shorthand for a [`ServiceError::NotFound`].
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        ServiceError::NotFound { entity, id }
    }

    /// A stable machine-readable name for the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::InvalidArgument(_) => "invalid_argument",
            ServiceError::NotFound { .. } => "not_found",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::NoFieldsProvided => "no_fields_provided",
            ServiceError::Internal(_) => "internal",
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(e: ValidationError) -> Self {
        match e {
            ValidationError::NoFieldsProvided => ServiceError::NoFieldsProvided,
            other => ServiceError::InvalidArgument(other.to_string()),
        }
    }
}

impl From<DataStoreError> for ServiceError {
    fn from(e: DataStoreError) -> Self {
        match e {
            DataStoreError::AlreadyExists => {
                ServiceError::Conflict("entity already exists".to_string())
            }
            DataStoreError::ForeignKeyViolation => {
                ServiceError::Conflict("operation violates a foreign key reference".to_string())
            }
            DataStoreError::NotFound => {
                ServiceError::Internal("row disappeared during operation".to_string())
            }
            DataStoreError::Internal(msg) => ServiceError::Internal(msg),
        }
    }
}
