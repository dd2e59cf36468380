//! The shopper principal: who is checking out.
//!
//! The storefront never authenticates anyone itself - the HTTP layer resolves
//! the ambient identity and hands the checkout core a [`Shopper`].

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// An anonymous browsing session key.
///
/// Guest carts are keyed by this value instead of a user ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    /// Wrap a raw session key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The principal placing an order.
///
/// Either an authenticated user or an anonymous guest identified only by a
/// session key. Guest orders carry no owner reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shopper {
    /// An authenticated user.
    User(UserId),
    /// An anonymous guest, identified by their browsing session.
    Guest(SessionKey),
}

impl Shopper {
    /// The owning user ID, if authenticated.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::User(id) => Some(*id),
            Self::Guest(_) => None,
        }
    }

    /// Whether this shopper is an anonymous guest.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        matches!(self, Self::Guest(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_shopper_exposes_its_id() {
        let shopper = Shopper::User(UserId::new(3));
        assert_eq!(shopper.user_id(), Some(UserId::new(3)));
        assert!(!shopper.is_guest());
    }

    #[test]
    fn guest_shopper_has_no_user_id() {
        let shopper = Shopper::Guest(SessionKey::new("abc123"));
        assert_eq!(shopper.user_id(), None);
        assert!(shopper.is_guest());
    }
}
