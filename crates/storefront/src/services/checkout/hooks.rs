//! Deferred-collaborator seams for the checkout transaction.
//!
//! Inventory reservation and coupon-usage recording are not performed by
//! the current checkout core, but both belong inside its transaction
//! boundary when they arrive. These traits run on the transaction's
//! connection so an implementation inherits the all-or-nothing scope
//! instead of re-deriving it.

use rust_decimal::Decimal;
use sqlx::PgConnection;

use crate::db::RepositoryError;
use crate::models::{Coupon, Order, OrderItem};

/// Reserves stock for a just-created order.
pub trait ReservationHook: Send + Sync {
    /// Called after the order rows are written, before commit.
    fn reserve(
        &self,
        conn: &mut PgConnection,
        order: &Order,
        items: &[OrderItem],
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Records a coupon redemption in the usage ledger.
pub trait CouponUsageHook: Send + Sync {
    /// Called after the order rows are written, before commit.
    fn record(
        &self,
        conn: &mut PgConnection,
        order: &Order,
        coupon: &Coupon,
        discount: Decimal,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Default reservation hook: reserves nothing.
///
/// Stock sufficiency stays an advisory check; a flash sale can oversell
/// until a real reservation hook lands.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReservation;

impl ReservationHook for NoopReservation {
    async fn reserve(
        &self,
        _conn: &mut PgConnection,
        _order: &Order,
        _items: &[OrderItem],
    ) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// Default coupon-usage hook: records nothing.
///
/// Usage counts therefore never increase from this service, which also
/// means a failed-then-retried checkout cannot double-count a redemption.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCouponUsage;

impl CouponUsageHook for NoopCouponUsage {
    async fn record(
        &self,
        _conn: &mut PgConnection,
        _order: &Order,
        _coupon: &Coupon,
        _discount: Decimal,
    ) -> Result<(), RepositoryError> {
        Ok(())
    }
}
