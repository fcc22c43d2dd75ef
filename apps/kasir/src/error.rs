//! # API Error Type
//!
//! Unified error type for API handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Kopi POS                               │
//! │                                                                         │
//! │  Handler returns Result<Json<T>, ApiError>                             │
//! │         │                                                               │
//! │         ├── CoreError     (cart caps)        ──┐                       │
//! │         ├── DbError       (persistence)      ──┤                       │
//! │         ├── CheckoutError (empty cart, ...)  ──┼──► ApiError           │
//! │         └── Success ───────────────────────────┘        │              │
//! │                                                          ▼              │
//! │                                   HTTP status + JSON body:             │
//! │                                   { "code": "EMPTY_CART",              │
//! │                                     "message": "Cannot check out..." } │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Print failures never appear here: they travel inside the checkout
//! response as a print status, because the sale itself succeeded.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use kopi_core::CoreError;
use kopi_db::DbError;

use crate::checkout::CheckoutError;

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: p-123"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Cart rule violation (422)
    CartError,

    /// Checkout attempted on an empty cart (422)
    EmptyCart,

    /// No receipt available to reprint (404)
    NothingToReprint,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound | ErrorCode::NothingToReprint => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::CartError | ErrorCode::EmptyCart => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match err {
            CoreError::ProductNotFound(_) | CoreError::EmployeeNotFound(_) => ErrorCode::NotFound,
            CoreError::CartTooLarge { .. } | CoreError::QuantityTooLarge { .. } => {
                ErrorCode::CartError
            }
            CoreError::EmptyCart => ErrorCode::EmptyCart,
        };
        ApiError::new(code, err.to_string())
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        let code = match err {
            DbError::NotFound { .. } => ErrorCode::NotFound,
            DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. } => {
                ErrorCode::ValidationError
            }
            _ => ErrorCode::DatabaseError,
        };
        ApiError::new(code, err.to_string())
    }
}

/// Converts checkout errors to API errors.
impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        let code = match err {
            CheckoutError::EmptyCart => ErrorCode::EmptyCart,
            CheckoutError::NothingToReprint => ErrorCode::NothingToReprint,
            CheckoutError::Persistence(_) => ErrorCode::DatabaseError,
        };
        ApiError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::EmptyCart.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            ErrorCode::DatabaseError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_body_shape() {
        let err = ApiError::not_found("Product", "p-123");

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: p-123");
    }

    #[test]
    fn test_core_error_conversion() {
        let api: ApiError = CoreError::EmptyCart.into();
        assert_eq!(api.code, ErrorCode::EmptyCart);

        let api: ApiError = CoreError::CartTooLarge { max: 100 }.into();
        assert_eq!(api.code, ErrorCode::CartError);
    }
}
