//! Unified error handling for the HTTP layer.
//!
//! Provides a unified `AppError` type that maps the checkout core's typed
//! failures onto transport statuses. All route handlers return
//! `Result<T, AppError>`; bodies use the same JSON envelope as success
//! responses (`success`, `error`).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::checkout::CheckoutError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Checkout failed; carries the full taxonomy.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Database operation failed outside checkout.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Checkout(err) => match err {
                CheckoutError::Validation(_) | CheckoutError::Rejected(_) => {
                    StatusCode::BAD_REQUEST
                }
                CheckoutError::PermissionDenied(_) => StatusCode::FORBIDDEN,
                CheckoutError::AddressNotFound(_) => StatusCode::NOT_FOUND,
                CheckoutError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request error");
        }

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            "an unexpected error occurred, please try again".to_owned()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "success": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tamarind_core::AddressId;

    #[test]
    fn validation_maps_to_400() {
        let err = AppError::from(CheckoutError::Validation("bad".to_owned()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn rejection_maps_to_400() {
        let err = AppError::from(CheckoutError::Rejected("cart is empty".to_owned()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn permission_denied_maps_to_403() {
        let err = AppError::from(CheckoutError::PermissionDenied("not yours".to_owned()));
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn missing_address_maps_to_404() {
        let err = AppError::from(CheckoutError::AddressNotFound(AddressId::new(9)));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_fault_maps_to_500() {
        let err = AppError::from(CheckoutError::Repository(RepositoryError::DataCorruption(
            "bad status".to_owned(),
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
