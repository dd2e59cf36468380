//! Cart domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use tamarind_core::{CartId, CartItemId, CartStatus, ProductId, UserId, VariantId};

/// A shopper's cart.
///
/// Exactly one cart may be `active` per owner; the checkout orchestrator
/// flips it to `ordered` exactly once, inside the checkout transaction.
#[derive(Debug, Clone)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// Owning user, or `None` for a guest cart.
    pub user_id: Option<UserId>,
    /// Guest session key, or `None` for a user cart.
    pub session_key: Option<String>,
    /// Cart lifecycle status.
    pub status: CartStatus,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
}

/// A cart line joined with current catalog state.
///
/// `unit_price` and `line_total` are the snapshot taken when the item was
/// added; `variant_active` and `available_stock` reflect the catalog at load
/// time and drive the fulfillability checks.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLine {
    /// Unique cart item ID.
    pub id: CartItemId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Referenced product variant.
    pub variant_id: VariantId,
    /// Display name of the product.
    pub product_name: String,
    /// Display name of the variant (e.g., "250g - Roasted").
    pub variant_name: String,
    /// Whether the variant is currently purchasable.
    pub variant_active: bool,
    /// Units currently in stock for the variant.
    pub available_stock: i32,
    /// Requested quantity; always positive.
    pub quantity: i32,
    /// Price snapshot per unit.
    pub unit_price: Decimal,
    /// `unit_price * quantity` snapshot.
    pub line_total: Decimal,
}

/// An active cart together with its lines.
#[derive(Debug, Clone)]
pub struct ActiveCart {
    pub cart: Cart,
    pub lines: Vec<CartLine>,
}

impl ActiveCart {
    /// Server-computed subtotal: the sum of line totals.
    ///
    /// Never taken from the request; this is the amount the coupon engine
    /// and the order totals are based on.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(|line| line.line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i32, unit_price: &str) -> CartLine {
        let unit_price: Decimal = unit_price.parse().expect("decimal literal");
        CartLine {
            id: CartItemId::new(1),
            product_id: ProductId::new(1),
            variant_id: VariantId::new(1),
            product_name: "Almonds".to_owned(),
            variant_name: "250g".to_owned(),
            variant_active: true,
            available_stock: 100,
            quantity,
            unit_price,
            line_total: unit_price * Decimal::from(quantity),
        }
    }

    fn cart_with(lines: Vec<CartLine>) -> ActiveCart {
        ActiveCart {
            cart: Cart {
                id: CartId::new(1),
                user_id: None,
                session_key: Some("s".to_owned()),
                status: CartStatus::Active,
                created_at: Utc::now(),
            },
            lines,
        }
    }

    #[test]
    fn subtotal_sums_line_totals() {
        let cart = cart_with(vec![line(2, "10.50"), line(1, "4.00")]);
        assert_eq!(cart.subtotal(), "25.00".parse::<Decimal>().expect("decimal"));
    }

    #[test]
    fn subtotal_of_empty_cart_is_zero() {
        let cart = cart_with(Vec::new());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }
}
