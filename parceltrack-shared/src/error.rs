/// Error taxonomy for the account service
///
/// All expected business outcomes are typed: `NotFound`, `Conflict` and
/// `InvalidCredentials` are ordinary results of valid requests, never
/// defects. Infrastructure failures (store backend, hashing, token
/// signing) travel in their own variants so the transport layer can map
/// them to 500s without ever confusing them with business outcomes.

use crate::auth::{jwt::JwtError, password::PasswordError};
use std::fmt;

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Typed failure of an account-service operation
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A referenced entity does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness or idempotency invariant would be violated
    #[error("{0} already exists")]
    Conflict(&'static str),

    /// Password verification failed
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing/verification infrastructure failed
    #[error("password operation failed: {0}")]
    Credential(#[from] PasswordError),

    /// Token signing failed
    #[error("token operation failed: {0}")]
    Token(#[from] JwtError),

    /// The store backend failed
    #[error("store error: {0}")]
    Store(StoreError),
}

/// Failure of a store operation
///
/// `Duplicate` is the authoritative uniqueness signal: the Postgres stores
/// translate unique-constraint violations into it, and the in-memory
/// stores enforce the same indexes by hand.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique index rejected the write
    #[error("duplicate {field}")]
    Duplicate {
        /// Logical field the violated index covers ("email", "code", ...)
        field: &'static str,
    },

    /// The targeted row does not exist
    #[error("record not found")]
    NotFound,

    /// Backend failure (connection, protocol, ...)
    #[error("backend error: {0}")]
    Backend(#[source] anyhow::Error),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            // Constraint violations are business conflicts, not defects.
            StoreError::Duplicate { field } => ServiceError::Conflict(field),
            other => ServiceError::Store(other),
        }
    }
}

/// Maps sqlx failures onto the store taxonomy
///
/// Unique-constraint violations become `Duplicate`, keyed by which index
/// fired; foreign-key violations mean the referenced row vanished and
/// become `NotFound`; everything else is a backend failure.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) => match db_err.kind() {
                sqlx::error::ErrorKind::UniqueViolation => {
                    if db_err.constraint().is_some_and(|c| c.contains("email")) {
                        StoreError::Duplicate { field: "email" }
                    } else {
                        StoreError::Duplicate {
                            field: "tracking code",
                        }
                    }
                }
                sqlx::error::ErrorKind::ForeignKeyViolation => StoreError::NotFound,
                _ => StoreError::Backend(anyhow::anyhow!("database error: {}", db_err)),
            },
            other => StoreError::Backend(anyhow::anyhow!("database error: {}", other)),
        }
    }
}

impl StoreError {
    /// Wraps an arbitrary backend failure.
    pub fn backend(err: impl fmt::Display) -> Self {
        StoreError::Backend(anyhow::anyhow!("{}", err))
    }
}
