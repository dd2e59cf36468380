//! Shipping-address resolution.
//!
//! A checkout request names its address in exactly one of two ways: a
//! reference to a saved address, or inline fields for a new one. The two
//! optional wire fields collapse into the [`AddressSource`] tagged union up
//! front, so the both/neither ambiguity is ruled out before any I/O.

use sqlx::PgConnection;

use tamarind_core::{AddressId, Shopper, UserId};

use super::CheckoutError;
use crate::db::addresses;
use crate::models::{Address, NewAddress};

/// Where the shipping address comes from.
#[derive(Debug, Clone)]
pub enum AddressSource {
    /// A saved address, referenced by ID. Authenticated shoppers only.
    Existing(AddressId),
    /// Inline fields for a new address, created during checkout.
    New(NewAddress),
}

impl AddressSource {
    /// Build the source from the two optional request fields.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Validation` when both or neither are given.
    pub fn from_parts(
        address_id: Option<AddressId>,
        address: Option<NewAddress>,
    ) -> Result<Self, CheckoutError> {
        match (address_id, address) {
            (Some(id), None) => Ok(Self::Existing(id)),
            (None, Some(fields)) => Ok(Self::New(fields)),
            (Some(_), Some(_)) | (None, None) => Err(CheckoutError::Validation(
                "provide exactly one of 'address_id' or 'address'".to_owned(),
            )),
        }
    }
}

/// A saved address reference requires an authenticated shopper.
///
/// # Errors
///
/// Returns `CheckoutError::PermissionDenied` for guests.
fn require_authenticated(shopper: &Shopper) -> Result<UserId, CheckoutError> {
    shopper.user_id().ok_or_else(|| {
        CheckoutError::PermissionDenied("guest shoppers cannot use a saved address".to_owned())
    })
}

/// A saved address may only be used by its owner; addresses created by
/// guests have no owner and can never be referenced again.
///
/// # Errors
///
/// Returns `CheckoutError::PermissionDenied` when `user_id` is not the owner.
fn ensure_owned_by(address: &Address, user_id: UserId) -> Result<(), CheckoutError> {
    if address.user_id == Some(user_id) {
        Ok(())
    } else {
        Err(CheckoutError::PermissionDenied(
            "cannot use another shopper's address".to_owned(),
        ))
    }
}

/// Required inline fields, checked in declaration order.
fn missing_fields(address: &NewAddress) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if address.name.trim().is_empty() {
        missing.push("name");
    }
    if address.phone.trim().is_empty() {
        missing.push("phone");
    }
    if address.full_address.trim().is_empty() {
        missing.push("full_address");
    }
    if address.country.trim().is_empty() {
        missing.push("country");
    }
    if address.district.trim().is_empty() {
        missing.push("district");
    }
    missing
}

/// Resolve the checkout request's address source into a persisted address.
///
/// Resolving an existing address performs no writes. Resolving a new one
/// inserts it on the caller's connection - inside the checkout transaction -
/// so the row never outlives a failed checkout.
///
/// # Errors
///
/// - `PermissionDenied` when a guest references a saved address, or the
///   address belongs to a different shopper.
/// - `AddressNotFound` when the referenced address does not exist.
/// - `Validation` when required inline fields are missing.
pub async fn resolve(
    conn: &mut PgConnection,
    shopper: &Shopper,
    source: AddressSource,
) -> Result<Address, CheckoutError> {
    match source {
        AddressSource::Existing(address_id) => {
            let user_id = require_authenticated(shopper)?;

            let address = addresses::find(conn, address_id)
                .await?
                .ok_or(CheckoutError::AddressNotFound(address_id))?;

            ensure_owned_by(&address, user_id)?;

            Ok(address)
        }
        AddressSource::New(fields) => {
            let missing = missing_fields(&fields);
            if !missing.is_empty() {
                return Err(CheckoutError::Validation(format!(
                    "missing required address fields: {}",
                    missing.join(", ")
                )));
            }

            let address = addresses::insert(conn, shopper.user_id(), &fields).await?;
            Ok(address)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tamarind_core::SessionKey;

    fn saved(owner: Option<UserId>) -> Address {
        Address {
            id: AddressId::new(7),
            user_id: owner,
            name: "John Doe".to_owned(),
            phone: "01712345678".to_owned(),
            full_address: "123 Main St, Apt 4B".to_owned(),
            country: "BD".to_owned(),
            district: "Dhaka".to_owned(),
            postal_code: None,
            email: None,
            is_default: false,
            created_at: Utc::now(),
        }
    }

    fn inline() -> NewAddress {
        NewAddress {
            name: "John Doe".to_owned(),
            phone: "01712345678".to_owned(),
            full_address: "123 Main St, Apt 4B".to_owned(),
            country: "BD".to_owned(),
            district: "Dhaka".to_owned(),
            postal_code: Some("1000".to_owned()),
            email: None,
            is_default: false,
        }
    }

    #[test]
    fn source_from_existing_reference() {
        let source = AddressSource::from_parts(Some(AddressId::new(5)), None).expect("valid");
        assert!(matches!(source, AddressSource::Existing(id) if id == AddressId::new(5)));
    }

    #[test]
    fn source_from_inline_fields() {
        let source = AddressSource::from_parts(None, Some(inline())).expect("valid");
        assert!(matches!(source, AddressSource::New(_)));
    }

    #[test]
    fn both_sources_rejected() {
        let err = AddressSource::from_parts(Some(AddressId::new(5)), Some(inline()))
            .expect_err("both given");
        assert!(matches!(err, CheckoutError::Validation(_)));
    }

    #[test]
    fn neither_source_rejected() {
        let err = AddressSource::from_parts(None, None).expect_err("neither given");
        assert!(matches!(err, CheckoutError::Validation(_)));
    }

    #[test]
    fn guest_cannot_reference_a_saved_address() {
        let guest = Shopper::Guest(SessionKey::new("abc123"));
        let err = require_authenticated(&guest).expect_err("guest");
        assert!(matches!(err, CheckoutError::PermissionDenied(ref msg) if msg.contains("guest")));
    }

    #[test]
    fn authenticated_shopper_passes_the_saved_address_gate() {
        let shopper = Shopper::User(UserId::new(3));
        assert_eq!(require_authenticated(&shopper).expect("user"), UserId::new(3));
    }

    #[test]
    fn owner_may_use_their_own_address() {
        let address = saved(Some(UserId::new(3)));
        assert!(ensure_owned_by(&address, UserId::new(3)).is_ok());
    }

    #[test]
    fn another_users_address_is_rejected() {
        let address = saved(Some(UserId::new(3)));
        let err = ensure_owned_by(&address, UserId::new(4)).expect_err("wrong owner");
        assert!(matches!(err, CheckoutError::PermissionDenied(_)));
    }

    #[test]
    fn unowned_address_is_rejected_even_for_users() {
        let address = saved(None);
        let err = ensure_owned_by(&address, UserId::new(3)).expect_err("no owner");
        assert!(matches!(err, CheckoutError::PermissionDenied(_)));
    }

    #[test]
    fn all_required_fields_present() {
        assert!(missing_fields(&inline()).is_empty());
    }

    #[test]
    fn missing_fields_are_named_in_order() {
        let mut fields = inline();
        fields.phone = String::new();
        fields.district = "  ".to_owned();
        assert_eq!(missing_fields(&fields), vec!["phone", "district"]);
    }

    #[test]
    fn optional_fields_are_not_required() {
        let mut fields = inline();
        fields.postal_code = None;
        fields.email = None;
        assert!(missing_fields(&fields).is_empty());
    }
}
