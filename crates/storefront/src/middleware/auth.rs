//! Shopper identity extractor.
//!
//! Authentication itself lives outside this service; the extractor only
//! resolves the ambient identity the caller supplies:
//!
//! - `Authorization: Bearer <token>` - looked up in the sessions table,
//!   yields an authenticated [`Shopper::User`];
//! - `X-Session-Key: <key>` - yields an anonymous [`Shopper::Guest`] whose
//!   cart is keyed by that session;
//! - neither - rejected, since no cart could ever be found.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use tamarind_core::{SessionKey, Shopper};

use crate::db::sessions;
use crate::state::AppState;

/// Header carrying the anonymous session key.
const SESSION_KEY_HEADER: &str = "x-session-key";

/// Extractor that resolves the requesting shopper.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentShopper(shopper): CurrentShopper) -> impl IntoResponse {
///     match shopper {
///         Shopper::User(id) => format!("hello, user {id}"),
///         Shopper::Guest(_) => "hello, guest".to_string(),
///     }
/// }
/// ```
pub struct CurrentShopper(pub Shopper);

/// Rejection for requests whose shopper identity cannot be resolved.
#[derive(Debug)]
pub enum ShopperRejection {
    /// Bearer token supplied but unknown or expired.
    InvalidToken,
    /// Neither a bearer token nor a session key was supplied.
    MissingIdentity,
    /// Session lookup failed.
    Database,
}

impl IntoResponse for ShopperRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid or expired session token"),
            Self::MissingIdentity => (
                StatusCode::BAD_REQUEST,
                "a bearer token or X-Session-Key header is required",
            ),
            Self::Database => {
                tracing::error!("session lookup failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "an unexpected error occurred, please try again",
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}

impl FromRequestParts<AppState> for CurrentShopper {
    type Rejection = ShopperRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(token) = bearer_token(parts) {
            let mut conn = state
                .pool()
                .acquire()
                .await
                .map_err(|_| ShopperRejection::Database)?;

            let user_id = sessions::find_user_by_token(&mut conn, &token)
                .await
                .map_err(|_| ShopperRejection::Database)?
                .ok_or(ShopperRejection::InvalidToken)?;

            return Ok(Self(Shopper::User(user_id)));
        }

        if let Some(key) = header_value(parts, SESSION_KEY_HEADER) {
            return Ok(Self(Shopper::Guest(SessionKey::new(key))));
        }

        Err(ShopperRejection::MissingIdentity)
    }
}

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}
