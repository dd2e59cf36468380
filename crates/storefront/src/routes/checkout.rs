//! Checkout route handler and its wire DTOs.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use tamarind_core::{AddressId, OrderId, OrderStatus, UserId};

use crate::error::AppError;
use crate::middleware::CurrentShopper;
use crate::models::{Address, NewAddress, Order, OrderItem};
use crate::services::checkout::{CheckoutRequest, CheckoutService, PlacedOrder};
use crate::state::AppState;

/// Inbound checkout request body.
///
/// Exactly one of `address_id` / `address` must be present; the checkout
/// service enforces that rule (and everything else).
#[derive(Debug, Deserialize)]
pub struct CheckoutPayload {
    /// Saved address reference (authenticated shoppers only).
    #[serde(default)]
    pub address_id: Option<AddressId>,
    /// Inline new address fields.
    #[serde(default)]
    pub address: Option<NewAddress>,
    /// Optional coupon code.
    #[serde(default)]
    pub coupon_code: Option<String>,
    /// Payment method label; defaults to `COD`.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Free-text order notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<CheckoutPayload> for CheckoutRequest {
    fn from(payload: CheckoutPayload) -> Self {
        Self {
            address_id: payload.address_id,
            address: payload.address,
            coupon_code: payload.coupon_code,
            payment_method: payload.payment_method,
            notes: payload.notes,
        }
    }
}

/// Shipping address as rendered in order responses.
#[derive(Debug, Serialize)]
pub struct AddressBody {
    pub id: AddressId,
    pub name: String,
    pub phone: String,
    pub full_address: String,
    pub country: String,
    pub district: String,
    pub postal_code: Option<String>,
    pub email: Option<String>,
    pub is_default: bool,
}

impl From<&Address> for AddressBody {
    fn from(address: &Address) -> Self {
        Self {
            id: address.id,
            name: address.name.clone(),
            phone: address.phone.clone(),
            full_address: address.full_address.clone(),
            country: address.country.clone(),
            district: address.district.clone(),
            postal_code: address.postal_code.clone(),
            email: address.email.clone(),
            is_default: address.is_default,
        }
    }
}

/// One order line as rendered in order responses.
#[derive(Debug, Serialize)]
pub struct OrderItemBody {
    pub product_name: String,
    pub variant_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl From<&OrderItem> for OrderItemBody {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_name: item.product_name.clone(),
            variant_name: item.variant_name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total: item.line_total,
        }
    }
}

/// A persisted order as rendered in responses.
#[derive(Debug, Serialize)]
pub struct OrderBody {
    pub id: OrderId,
    pub order_number: String,
    pub user_id: Option<UserId>,
    pub is_guest: bool,
    pub shipping_address: Option<AddressBody>,
    pub items: Vec<OrderItemBody>,
    pub total_amount: Decimal,
    pub discount_amount: Decimal,
    pub payable_amount: Decimal,
    pub coupon_code: Option<String>,
    pub payment_method: String,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
}

impl OrderBody {
    pub(crate) fn new(order: &Order, items: &[OrderItem], address: Option<&Address>) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number.clone(),
            user_id: order.user_id,
            is_guest: order.is_guest,
            shipping_address: address.map(AddressBody::from),
            items: items.iter().map(OrderItemBody::from).collect(),
            total_amount: order.total_amount,
            discount_amount: order.discount_amount,
            payable_amount: order.payable_amount,
            coupon_code: (!order.coupon_code.is_empty()).then(|| order.coupon_code.clone()),
            payment_method: order.payment_method.clone(),
            status: order.status,
            placed_at: order.placed_at,
        }
    }
}

/// Successful checkout response envelope.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub success: bool,
    pub message: String,
    pub order: OrderBody,
}

impl From<&PlacedOrder> for CheckoutResponse {
    fn from(placed: &PlacedOrder) -> Self {
        Self {
            success: true,
            message: "order placed successfully".to_owned(),
            order: OrderBody::new(&placed.order, &placed.items, Some(&placed.shipping_address)),
        }
    }
}

/// `POST /api/checkout` - resolve the cart into a persisted order.
///
/// Returns 201 with the order on success; 400/403/404 for the typed
/// checkout failures; 500 for storage faults (after a full rollback).
#[instrument(skip_all, fields(is_guest = shopper.is_guest()))]
pub async fn checkout(
    State(state): State<AppState>,
    CurrentShopper(shopper): CurrentShopper,
    Json(payload): Json<CheckoutPayload>,
) -> Result<impl IntoResponse, AppError> {
    let service = CheckoutService::new(state.pool().clone());

    let placed = service.process_checkout(&shopper, payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse::from(&placed)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_with_saved_address_deserializes() {
        let payload: CheckoutPayload = serde_json::from_str(
            r#"{
                "address_id": 123,
                "coupon_code": "SAVE10",
                "payment_method": "COD",
                "notes": "please call before delivery"
            }"#,
        )
        .expect("valid payload");

        assert_eq!(payload.address_id, Some(AddressId::new(123)));
        assert!(payload.address.is_none());
        assert_eq!(payload.coupon_code.as_deref(), Some("SAVE10"));
    }

    #[test]
    fn payload_with_inline_address_deserializes() {
        let payload: CheckoutPayload = serde_json::from_str(
            r#"{
                "address": {
                    "name": "John Doe",
                    "phone": "01712345678",
                    "full_address": "123 Main St, Apt 4B",
                    "country": "BD",
                    "district": "Dhaka",
                    "postal_code": "1000",
                    "email": "john@example.com"
                }
            }"#,
        )
        .expect("valid payload");

        let address = payload.address.expect("inline address");
        assert_eq!(address.name, "John Doe");
        assert_eq!(address.postal_code.as_deref(), Some("1000"));
        assert!(!address.is_default);
        assert!(payload.coupon_code.is_none());
        assert!(payload.payment_method.is_none());
    }

    #[test]
    fn empty_payload_deserializes_to_all_none() {
        let payload: CheckoutPayload = serde_json::from_str("{}").expect("valid payload");
        assert!(payload.address_id.is_none());
        assert!(payload.address.is_none());
    }
}
