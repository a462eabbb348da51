use crate::data::errors::StoreError;
use crate::security::errors::AuthError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum OrderServiceError {
    /// Malformed cart, rejected before touching the store.
    #[error("{0}")]
    Validation(String),

    #[error("Products not found: {}", format_ids(.0))]
    ProductNotFound(Vec<i32>),

    #[error("Insufficient stock for product {product_id}")]
    InsufficientStock { product_id: i32 },

    /// Lost a deadlock or serialization race; resubmitting is safe.
    #[error("Order conflicted with a concurrent update, please retry")]
    ConcurrentModification,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<StoreError> for OrderServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => OrderServiceError::ConcurrentModification,
            other => OrderServiceError::DatabaseError(other.to_string()),
        }
    }
}

fn format_ids(ids: &[i32]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error, PartialEq)]
pub enum ProductServiceError {
    #[error("Product not found")]
    ProductNotFound,
    #[error("{0}")]
    InvalidProduct(String),
    #[error("Product is referenced by existing orders")]
    ProductInUse,
    #[error("Permission denied")]
    PermissionDenied,
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<StoreError> for ProductServiceError {
    fn from(err: StoreError) -> Self {
        ProductServiceError::DatabaseError(err.to_string())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum UserServiceError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Email is already registered")]
    EmailTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<StoreError> for UserServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(_) => UserServiceError::EmailTaken,
            other => UserServiceError::DatabaseError(other.to_string()),
        }
    }
}
