//! Coupon lookup, eligibility, and discount computation.
//!
//! Deterministic and side-effect-free: the usage ledger is only read here.
//! Recording a redemption is deferred to the
//! [`CouponUsageHook`](super::hooks::CouponUsageHook) so a failed checkout
//! never inflates a shopper's usage count.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;

use tamarind_core::Shopper;

use super::CheckoutError;
use crate::db::coupons;
use crate::models::{Coupon, CouponUsageCounts};

/// The outcome of coupon application.
#[derive(Debug, Clone)]
pub struct AppliedCoupon {
    /// Discount to subtract from the subtotal; zero when no coupon applied.
    pub discount: Decimal,
    /// The coupon that produced the discount, if any.
    pub coupon: Option<Coupon>,
}

impl AppliedCoupon {
    fn none() -> Self {
        Self {
            discount: Decimal::ZERO,
            coupon: None,
        }
    }
}

/// Apply an optional coupon code against the cart subtotal.
///
/// No code is not an error: checkout proceeds without a discount.
///
/// # Errors
///
/// Returns `CheckoutError::Rejected` for an unknown, inactive, or
/// ineligible coupon, naming the specific reason.
pub async fn apply(
    conn: &mut PgConnection,
    code: Option<&str>,
    subtotal: Decimal,
    shopper: &Shopper,
) -> Result<AppliedCoupon, CheckoutError> {
    let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(AppliedCoupon::none());
    };

    let coupon = coupons::find_by_code(conn, code)
        .await?
        .filter(|c| c.active)
        .ok_or_else(|| CheckoutError::Rejected(format!("invalid or expired coupon: {code}")))?;

    let usage = coupons::usage_counts(conn, coupon.id, shopper.user_id()).await?;

    let discount = evaluate(&coupon, usage, subtotal, Utc::now())?;

    Ok(AppliedCoupon {
        discount,
        coupon: Some(coupon),
    })
}

/// Pure eligibility-and-discount evaluation.
///
/// # Errors
///
/// Returns `CheckoutError::Rejected` with the coupon's rejection reason.
fn evaluate(
    coupon: &Coupon,
    usage: CouponUsageCounts,
    subtotal: Decimal,
    now: DateTime<Utc>,
) -> Result<Decimal, CheckoutError> {
    coupon
        .check_redeemable(usage, subtotal, now)
        .map_err(CheckoutError::Rejected)?;

    Ok(coupon.discount_for(subtotal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tamarind_core::CouponId;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    fn save10() -> Coupon {
        let now = Utc::now();
        Coupon {
            id: CouponId::new(1),
            code: "SAVE10".to_owned(),
            active: true,
            discount_percent: Some(dec("10")),
            discount_amount: None,
            max_discount: None,
            min_order_amount: None,
            max_uses: None,
            per_user_limit: None,
            valid_from: Some(now - Duration::days(1)),
            valid_to: Some(now + Duration::days(1)),
        }
    }

    #[test]
    fn ten_percent_off_two_hundred() {
        let discount = evaluate(
            &save10(),
            CouponUsageCounts::default(),
            dec("200.00"),
            Utc::now(),
        )
        .expect("eligible");
        assert_eq!(discount, dec("20.00"));
    }

    #[test]
    fn subtotal_below_minimum_is_rejected() {
        let mut coupon = save10();
        coupon.min_order_amount = Some(dec("100.00"));
        let err = evaluate(
            &coupon,
            CouponUsageCounts::default(),
            dec("50.00"),
            Utc::now(),
        )
        .expect_err("below minimum");
        assert!(matches!(err, CheckoutError::Rejected(ref msg) if msg.contains("minimum order")));
    }

    #[test]
    fn expired_coupon_is_rejected() {
        let mut coupon = save10();
        coupon.valid_to = Some(Utc::now() - Duration::hours(1));
        let err = evaluate(
            &coupon,
            CouponUsageCounts::default(),
            dec("200.00"),
            Utc::now(),
        )
        .expect_err("expired");
        assert!(matches!(err, CheckoutError::Rejected(_)));
    }

    #[test]
    fn discount_never_exceeds_subtotal() {
        let mut coupon = save10();
        coupon.discount_percent = None;
        coupon.discount_amount = Some(dec("500.00"));
        let discount = evaluate(
            &coupon,
            CouponUsageCounts::default(),
            dec("200.00"),
            Utc::now(),
        )
        .expect("eligible");
        assert_eq!(discount, dec("200.00"));
    }
}
