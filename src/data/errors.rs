use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Errors raised by the store handles.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query failed: {0}")]
    Query(DieselError),

    #[error("connection pool error: {0}")]
    Pool(String),

    /// Deadlock or serialization failure reported by the backend.
    #[error("transaction conflict: {0}")]
    Conflict(String),

    #[error("duplicate value: {0}")]
    Duplicate(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<DieselError> for StoreError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, info) => {
                StoreError::Conflict(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                StoreError::Duplicate(info.message().to_string())
            }
            // MySQL surfaces deadlocks (1213) and lock wait timeouts (1205) as unknown kinds.
            DieselError::DatabaseError(_, info) if is_lock_failure(info.message()) => {
                StoreError::Conflict(info.message().to_string())
            }
            other => StoreError::Query(other),
        }
    }
}

impl From<diesel_async::pooled_connection::deadpool::PoolError> for StoreError {
    fn from(err: diesel_async::pooled_connection::deadpool::PoolError) -> Self {
        StoreError::Pool(err.to_string())
    }
}

fn is_lock_failure(message: &str) -> bool {
    message.starts_with("Deadlock found") || message.starts_with("Lock wait timeout")
}
