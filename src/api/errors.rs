use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use crate::api::response::MessageResponse;
use crate::security::errors::AuthError;
use crate::services::errors::{OrderServiceError, ProductServiceError, UserServiceError};

/// Errors returned by the HTTP handlers.
#[derive(Debug, PartialEq)]
pub enum APIErrors {
    BadRequest(String),
    Unauthorized,
    Forbidden,
    NotFound(String),
    Conflict(String),
    /// Details are logged where the error is created, never sent back.
    InternalServerError,
}

impl IntoResponse for APIErrors {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            APIErrors::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            APIErrors::Unauthorized => (StatusCode::UNAUTHORIZED, "Not authorized".to_string()),
            APIErrors::Forbidden => (StatusCode::FORBIDDEN, "Permission denied".to_string()),
            APIErrors::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            APIErrors::Conflict(msg) => (StatusCode::CONFLICT, msg),
            APIErrors::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(MessageResponse { message })).into_response()
    }
}

impl From<OrderServiceError> for APIErrors {
    fn from(err: OrderServiceError) -> Self {
        match err {
            OrderServiceError::Validation(msg) => APIErrors::BadRequest(msg),
            e @ OrderServiceError::ProductNotFound(_) => APIErrors::NotFound(e.to_string()),
            e @ OrderServiceError::InsufficientStock { .. } => APIErrors::Conflict(e.to_string()),
            e @ OrderServiceError::ConcurrentModification => APIErrors::Conflict(e.to_string()),
            OrderServiceError::DatabaseError(reason) => {
                tracing::error!(%reason, "Order request failed");
                APIErrors::InternalServerError
            }
        }
    }
}

impl From<ProductServiceError> for APIErrors {
    fn from(err: ProductServiceError) -> Self {
        match err {
            e @ ProductServiceError::ProductNotFound => APIErrors::NotFound(e.to_string()),
            ProductServiceError::InvalidProduct(msg) => APIErrors::BadRequest(msg),
            e @ ProductServiceError::ProductInUse => APIErrors::Conflict(e.to_string()),
            ProductServiceError::PermissionDenied => APIErrors::Forbidden,
            ProductServiceError::DatabaseError(reason) => {
                tracing::error!(%reason, "Product request failed");
                APIErrors::InternalServerError
            }
        }
    }
}

impl From<UserServiceError> for APIErrors {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::InvalidInput(msg) => APIErrors::BadRequest(msg),
            e @ UserServiceError::EmailTaken => APIErrors::Conflict(e.to_string()),
            UserServiceError::InvalidCredentials => APIErrors::Unauthorized,
            UserServiceError::Auth(e) => {
                tracing::error!(error = %e, "Credential processing failed");
                APIErrors::InternalServerError
            }
            UserServiceError::DatabaseError(reason) => {
                tracing::error!(%reason, "User request failed");
                APIErrors::InternalServerError
            }
        }
    }
}

impl From<AuthError> for APIErrors {
    fn from(err: AuthError) -> Self {
        tracing::warn!(error = %err, "Rejected access token");
        APIErrors::Unauthorized
    }
}
