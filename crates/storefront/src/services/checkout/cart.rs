//! Cart loading and validation.
//!
//! The validator is read-only: it confirms the cart exists, is non-empty,
//! and is still fulfillable against current catalog state. The inventory
//! comparison is advisory - nothing is reserved here, so a concurrent sale
//! can still outrun a passing check. Reservation is the job of the
//! [`ReservationHook`](super::hooks::ReservationHook) seam.

use sqlx::PgConnection;

use tamarind_core::Shopper;

use super::CheckoutError;
use crate::db::carts;
use crate::models::{ActiveCart, CartLine};

/// Load the shopper's active cart with its lines, locking the cart row.
///
/// # Errors
///
/// Returns `CheckoutError::Rejected` when no active cart exists.
pub async fn load_active(
    conn: &mut PgConnection,
    shopper: &Shopper,
) -> Result<ActiveCart, CheckoutError> {
    let cart = carts::find_active(conn, shopper)
        .await?
        .ok_or_else(|| CheckoutError::Rejected("no active cart found".to_owned()))?;

    let lines = carts::lines(conn, cart.id).await?;

    Ok(ActiveCart { cart, lines })
}

/// Check the loaded cart can be converted into an order.
///
/// # Errors
///
/// Returns `CheckoutError::Rejected` when the cart is empty, references an
/// inactive variant, or asks for more units than are in stock.
pub fn ensure_fulfillable(lines: &[CartLine]) -> Result<(), CheckoutError> {
    if lines.is_empty() {
        return Err(CheckoutError::Rejected("cart is empty".to_owned()));
    }

    for line in lines {
        if !line.variant_active {
            return Err(CheckoutError::Rejected(format!(
                "product '{}' is no longer available",
                line.product_name
            )));
        }

        if line.available_stock < line.quantity {
            return Err(CheckoutError::Rejected(format!(
                "insufficient stock for '{}': available {}, requested {}",
                line.product_name, line.available_stock, line.quantity
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tamarind_core::{CartItemId, ProductId, VariantId};

    fn line(name: &str, active: bool, stock: i32, quantity: i32) -> CartLine {
        let unit_price: Decimal = "10.00".parse().expect("decimal literal");
        CartLine {
            id: CartItemId::new(1),
            product_id: ProductId::new(1),
            variant_id: VariantId::new(1),
            product_name: name.to_owned(),
            variant_name: "default".to_owned(),
            variant_active: active,
            available_stock: stock,
            quantity,
            unit_price,
            line_total: unit_price * Decimal::from(quantity),
        }
    }

    #[test]
    fn empty_cart_is_rejected() {
        let err = ensure_fulfillable(&[]).expect_err("empty cart");
        assert!(matches!(err, CheckoutError::Rejected(ref msg) if msg == "cart is empty"));
    }

    #[test]
    fn inactive_variant_is_rejected_by_name() {
        let lines = vec![line("Almonds", true, 10, 1), line("Cashews", false, 10, 1)];
        let err = ensure_fulfillable(&lines).expect_err("inactive variant");
        assert!(matches!(err, CheckoutError::Rejected(ref msg) if msg.contains("Cashews")));
    }

    #[test]
    fn insufficient_stock_is_rejected_with_counts() {
        let lines = vec![line("Almonds", true, 2, 5)];
        let err = ensure_fulfillable(&lines).expect_err("insufficient stock");
        assert!(
            matches!(err, CheckoutError::Rejected(ref msg)
                if msg.contains("available 2") && msg.contains("requested 5"))
        );
    }

    #[test]
    fn fulfillable_cart_passes() {
        let lines = vec![line("Almonds", true, 5, 5)];
        assert!(ensure_fulfillable(&lines).is_ok());
    }
}
