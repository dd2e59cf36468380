//! Shipping address domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tamarind_core::{AddressId, UserId};

/// A persisted shipping address.
///
/// `user_id` is `None` for guest-created addresses; an address with an owner
/// may only be referenced at checkout by that same owner.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Address {
    /// Unique address ID.
    pub id: AddressId,
    /// Owning user, or `None` for a guest-created address.
    pub user_id: Option<UserId>,
    /// Recipient name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Free-text street address.
    pub full_address: String,
    /// Country code or name.
    pub country: String,
    /// District / state.
    pub district: String,
    /// Postal code, if supplied.
    pub postal_code: Option<String>,
    /// Contact email, if supplied.
    pub email: Option<String>,
    /// Whether this is the owner's default address.
    pub is_default: bool,
    /// When the address was created.
    pub created_at: DateTime<Utc>,
}

/// Inline address fields supplied with a checkout request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAddress {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub full_address: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}
