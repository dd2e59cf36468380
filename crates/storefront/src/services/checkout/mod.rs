//! Checkout orchestration.
//!
//! [`CheckoutService::process_checkout`] is the single entry point that
//! turns a shopper's active cart into a persisted order. All persistence
//! happens inside one transaction: the resolved (possibly newly inserted)
//! address, the order and its items, the cart status flip, and the deferred
//! collaborator hooks either all commit or all roll back. A failed attempt
//! leaves the store exactly as it was.

mod address;
mod cart;
mod coupon;
mod error;
mod hooks;

pub use address::AddressSource;
pub use coupon::AppliedCoupon;
pub use error::CheckoutError;
pub use hooks::{CouponUsageHook, NoopCouponUsage, NoopReservation, ReservationHook};

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;

use tamarind_core::Shopper;

use crate::db::{carts, orders};
use crate::models::{Address, Coupon, NewOrder, NewOrderItem, Order, OrderItem};

/// Default payment-method label when the request supplies none.
const DEFAULT_PAYMENT_METHOD: &str = "COD";

/// A validated checkout request, as the service consumes it.
///
/// The HTTP layer deserializes the wire shape and hands it over unchanged;
/// the address source pair is collapsed into [`AddressSource`] here, not at
/// the edge, so the both/neither rule lives with the rest of the checkout
/// rules.
#[derive(Debug, Clone, Default)]
pub struct CheckoutRequest {
    pub address_id: Option<tamarind_core::AddressId>,
    pub address: Option<crate::models::NewAddress>,
    pub coupon_code: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

/// A successfully placed order with everything the caller needs to render it.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub shipping_address: Address,
    pub coupon: Option<Coupon>,
}

/// The three server-computed amounts on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Amounts {
    total: Decimal,
    discount: Decimal,
    payable: Decimal,
}

/// `payable = max(total - discount, 0)`; the total is always the cart
/// subtotal, never a figure from the request.
fn compute_amounts(subtotal: Decimal, discount: Decimal) -> Amounts {
    Amounts {
        total: subtotal,
        discount,
        payable: (subtotal - discount).max(Decimal::ZERO),
    }
}

/// Checkout orchestrator.
///
/// Generic over the two deferred-collaborator hooks; the defaults do
/// nothing, matching the current design where reservation and usage-ledger
/// writes are explicitly out of scope.
pub struct CheckoutService<R = NoopReservation, C = NoopCouponUsage> {
    pool: PgPool,
    reservations: R,
    coupon_usage: C,
}

impl CheckoutService {
    /// Create a checkout service with the no-op hooks.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            reservations: NoopReservation,
            coupon_usage: NoopCouponUsage,
        }
    }
}

impl<R, C> CheckoutService<R, C>
where
    R: ReservationHook,
    C: CouponUsageHook,
{
    /// Create a checkout service with explicit hooks.
    #[must_use]
    pub fn with_hooks(pool: PgPool, reservations: R, coupon_usage: C) -> Self {
        Self {
            pool,
            reservations,
            coupon_usage,
        }
    }

    /// Process a checkout request for the given shopper.
    ///
    /// Steps, all inside one transaction:
    /// 1. resolve the shipping address (inserting a new one if inline);
    /// 2. load and validate the shopper's active cart (row-locked);
    /// 3. apply the optional coupon against the server-computed subtotal;
    /// 4. insert the order and one item per cart line;
    /// 5. flip the cart to `ordered` (guarded against concurrent checkout);
    /// 6. run the deferred hooks, then commit.
    ///
    /// # Errors
    ///
    /// Propagates the originating [`CheckoutError`] unchanged; on any error
    /// the transaction has rolled back and no partial state is observable.
    pub async fn process_checkout(
        &self,
        shopper: &Shopper,
        request: CheckoutRequest,
    ) -> Result<PlacedOrder, CheckoutError> {
        let source = AddressSource::from_parts(request.address_id, request.address)?;

        let mut tx = self.pool.begin().await?;

        let shipping_address = address::resolve(&mut tx, shopper, source).await?;

        let active_cart = cart::load_active(&mut tx, shopper).await?;
        cart::ensure_fulfillable(&active_cart.lines)?;

        let subtotal = active_cart.subtotal();
        let applied = coupon::apply(&mut tx, request.coupon_code.as_deref(), subtotal, shopper)
            .await?;
        let amounts = compute_amounts(subtotal, applied.discount);

        let order_number = orders::next_order_number(&mut tx, Utc::now().date_naive()).await?;

        let order = orders::insert(
            &mut tx,
            &NewOrder {
                order_number,
                user_id: shopper.user_id(),
                shipping_address_id: shipping_address.id,
                coupon_id: applied.coupon.as_ref().map(|c| c.id),
                coupon_code: applied
                    .coupon
                    .as_ref()
                    .map(|c| c.code.clone())
                    .unwrap_or_default(),
                total_amount: amounts.total,
                discount_amount: amounts.discount,
                payable_amount: amounts.payable,
                payment_method: request
                    .payment_method
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_owned()),
                notes: request.notes.unwrap_or_default(),
            },
        )
        .await?;

        let new_items: Vec<NewOrderItem> = active_cart
            .lines
            .iter()
            .map(|line| NewOrderItem {
                product_id: line.product_id,
                variant_id: line.variant_id,
                product_name: line.product_name.clone(),
                variant_name: line.variant_name.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                line_total: line.line_total,
            })
            .collect();
        let items = orders::insert_items(&mut tx, order.id, &new_items).await?;

        // The row lock from load_active makes this flip race-free; a cart
        // consumed by a concurrent checkout surfaces as not-active here.
        if !carts::mark_ordered(&mut tx, active_cart.cart.id).await? {
            return Err(CheckoutError::Rejected("no active cart found".to_owned()));
        }

        self.reservations.reserve(&mut tx, &order, &items).await?;
        if let Some(coupon) = &applied.coupon {
            self.coupon_usage
                .record(&mut tx, &order, coupon, applied.discount)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            order_number = %order.order_number,
            is_guest = order.is_guest,
            payable = %order.payable_amount,
            "checkout committed"
        );

        Ok(PlacedOrder {
            order,
            items,
            shipping_address,
            coupon: applied.coupon,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    #[test]
    fn payable_is_total_minus_discount() {
        let amounts = compute_amounts(dec("200.00"), dec("20.00"));
        assert_eq!(amounts.total, dec("200.00"));
        assert_eq!(amounts.discount, dec("20.00"));
        assert_eq!(amounts.payable, dec("180.00"));
    }

    #[test]
    fn payable_is_floored_at_zero() {
        let amounts = compute_amounts(dec("30.00"), dec("50.00"));
        assert_eq!(amounts.payable, Decimal::ZERO);
    }

    #[test]
    fn zero_discount_leaves_payable_at_total() {
        let amounts = compute_amounts(dec("75.25"), Decimal::ZERO);
        assert_eq!(amounts.payable, dec("75.25"));
    }
}
