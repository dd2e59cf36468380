//! Checkout error types.

use thiserror::Error;

use tamarind_core::AddressId;

use crate::db::RepositoryError;

/// Errors that can occur while processing a checkout.
///
/// The taxonomy maps one-to-one onto transport statuses: `Validation` and
/// `Rejected` are client-correctable (400), `PermissionDenied` is an
/// ownership violation (403), `AddressNotFound` a dangling reference (404),
/// and `Repository` a storage fault (500). None of these trigger a retry
/// inside the core; the whole transaction has rolled back by the time the
/// caller sees the error.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Malformed or contradictory input, detectable before any write.
    #[error("{0}")]
    Validation(String),

    /// Business-rule rejection: empty cart, unavailable product,
    /// invalid or ineligible coupon, cart not found.
    #[error("{0}")]
    Rejected(String),

    /// Ownership violation on a saved address.
    #[error("{0}")]
    PermissionDenied(String),

    /// The referenced saved address does not exist.
    #[error("address {0} not found")]
    AddressNotFound(AddressId),

    /// Storage fault; the attempt is safe to retry from scratch.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}
