//! Order domain types.
//!
//! Orders and their items are created once, atomically, by the checkout
//! orchestrator and are immutable afterwards as far as this service is
//! concerned; fulfillment transitions happen elsewhere.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use tamarind_core::{AddressId, CouponId, OrderId, OrderItemId, OrderStatus, ProductId, UserId, VariantId};

/// A persisted order.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Human-readable order number, `ORD-YYYYMMDD-XXXXX`.
    pub order_number: String,
    /// Owning user, or `None` for a guest order.
    pub user_id: Option<UserId>,
    /// Derived: `user_id` is `None`.
    pub is_guest: bool,
    /// Resolved shipping address.
    pub shipping_address_id: AddressId,
    /// Applied coupon, if any.
    pub coupon_id: Option<CouponId>,
    /// Snapshot of the coupon code used; empty when no coupon applied.
    pub coupon_code: String,
    /// Cart subtotal at checkout time, pre-discount.
    pub total_amount: Decimal,
    /// Discount applied.
    pub discount_amount: Decimal,
    /// `max(total_amount - discount_amount, 0)`.
    pub payable_amount: Decimal,
    /// Payment method label; no gateway integration behind it.
    pub payment_method: String,
    /// Free-text notes from the shopper.
    pub notes: String,
    /// Order lifecycle status; `pending` at creation.
    pub status: OrderStatus,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
}

/// A snapshot of one cart line at order time.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    /// Unique order item ID.
    pub id: OrderItemId,
    /// Owning order.
    pub order_id: OrderId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Referenced variant.
    pub variant_id: VariantId,
    /// Product display name at order time.
    pub product_name: String,
    /// Variant display name at order time.
    pub variant_name: String,
    /// Ordered quantity.
    pub quantity: i32,
    /// Unit price at order time.
    pub unit_price: Decimal,
    /// `unit_price * quantity`.
    pub line_total: Decimal,
}

/// Fields for inserting an order row.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub user_id: Option<UserId>,
    pub shipping_address_id: AddressId,
    pub coupon_id: Option<CouponId>,
    pub coupon_code: String,
    pub total_amount: Decimal,
    pub discount_amount: Decimal,
    pub payable_amount: Decimal,
    pub payment_method: String,
    pub notes: String,
}

/// Fields for inserting an order item row.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub product_name: String,
    pub variant_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}
