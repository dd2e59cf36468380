//! Coupon domain type and its rule set.
//!
//! A coupon carries either a fixed amount or a percentage (never both),
//! an optional cap for percentage discounts, an optional validity window,
//! and optional usage limits. Eligibility and discount computation are pure
//! functions of the coupon, the subtotal, and previously recorded usage -
//! nothing here writes to the usage ledger.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use tamarind_core::CouponId;

/// A discount coupon. Read-only in the checkout core.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Coupon {
    /// Unique coupon ID.
    pub id: CouponId,
    /// Unique redemption code.
    pub code: String,
    /// Whether the coupon is enabled at all.
    pub active: bool,
    /// Percentage discount (0-100), exclusive with `discount_amount`.
    pub discount_percent: Option<Decimal>,
    /// Fixed discount amount, exclusive with `discount_percent`.
    pub discount_amount: Option<Decimal>,
    /// Cap applied to percentage discounts.
    pub max_discount: Option<Decimal>,
    /// Minimum cart subtotal required to redeem.
    pub min_order_amount: Option<Decimal>,
    /// Global redemption limit across all shoppers.
    pub max_uses: Option<i32>,
    /// Redemption limit per authenticated user.
    pub per_user_limit: Option<i32>,
    /// Start of the validity window.
    pub valid_from: Option<DateTime<Utc>>,
    /// End of the validity window.
    pub valid_to: Option<DateTime<Utc>>,
}

/// Recorded usage counts for a coupon, read from the usage ledger.
#[derive(Debug, Clone, Copy, Default)]
pub struct CouponUsageCounts {
    /// Total redemptions across all shoppers.
    pub total: i64,
    /// Redemptions by the requesting user (0 for guests).
    pub by_user: i64,
}

impl Coupon {
    /// Whether the coupon is enabled and inside its validity window.
    ///
    /// A coupon without a complete window is never valid; merchants set both
    /// ends when publishing a code.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if !self.active {
            return false;
        }
        match (self.valid_from, self.valid_to) {
            (Some(from), Some(to)) => from <= now && now <= to,
            _ => false,
        }
    }

    /// Check whether the coupon can be redeemed right now.
    ///
    /// Returns the human-readable rejection reason on failure. Usage counts
    /// must be read by the caller; this function is side-effect-free.
    ///
    /// # Errors
    ///
    /// Returns the rejection reason if the coupon is expired, the subtotal is
    /// below the minimum, or a usage limit has been reached.
    pub fn check_redeemable(
        &self,
        usage: CouponUsageCounts,
        subtotal: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), String> {
        if !self.is_valid_at(now) {
            return Err("coupon is not valid or has expired".to_owned());
        }

        if let Some(minimum) = self.min_order_amount
            && subtotal < minimum
        {
            return Err(format!("minimum order amount is {minimum}"));
        }

        if let Some(max_uses) = self.max_uses
            && usage.total >= i64::from(max_uses)
        {
            return Err("coupon usage limit reached".to_owned());
        }

        if let Some(per_user) = self.per_user_limit
            && usage.by_user >= i64::from(per_user)
        {
            return Err("you have reached the usage limit for this coupon".to_owned());
        }

        Ok(())
    }

    /// Compute the discount for a given subtotal.
    ///
    /// Fixed-amount coupons discount their amount; percentage coupons are
    /// rounded to two decimal places and capped by `max_discount` when set.
    /// The result never exceeds the subtotal.
    #[must_use]
    pub fn discount_for(&self, subtotal: Decimal) -> Decimal {
        let discount = if let Some(amount) = self.discount_amount {
            amount
        } else if let Some(percent) = self.discount_percent {
            let raw = (subtotal * percent / Decimal::ONE_HUNDRED).round_dp(2);
            match self.max_discount {
                Some(cap) => raw.min(cap),
                None => raw,
            }
        } else {
            Decimal::ZERO
        };

        discount.min(subtotal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    fn coupon() -> Coupon {
        let now = Utc::now();
        Coupon {
            id: CouponId::new(1),
            code: "SAVE10".to_owned(),
            active: true,
            discount_percent: None,
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
    fn percentage_discount_on_two_hundred() {
        let mut c = coupon();
        c.discount_percent = Some(dec("10"));
        assert_eq!(c.discount_for(dec("200.00")), dec("20.00"));
    }

    #[test]
    fn percentage_discount_respects_cap() {
        let mut c = coupon();
        c.discount_percent = Some(dec("50"));
        c.max_discount = Some(dec("30.00"));
        assert_eq!(c.discount_for(dec("200.00")), dec("30.00"));
    }

    #[test]
    fn fixed_discount_is_clamped_to_subtotal() {
        let mut c = coupon();
        c.discount_amount = Some(dec("80.00"));
        assert_eq!(c.discount_for(dec("50.00")), dec("50.00"));
    }

    #[test]
    fn percentage_discount_rounds_to_cents() {
        let mut c = coupon();
        c.discount_percent = Some(dec("7.5"));
        // 33.33 * 7.5% = 2.49975 -> 2.50
        assert_eq!(c.discount_for(dec("33.33")), dec("2.50"));
    }

    #[test]
    fn inactive_coupon_is_not_redeemable() {
        let mut c = coupon();
        c.active = false;
        let err = c
            .check_redeemable(CouponUsageCounts::default(), dec("100"), Utc::now())
            .expect_err("inactive coupon");
        assert!(err.contains("not valid"));
    }

    #[test]
    fn missing_validity_window_is_not_redeemable() {
        let mut c = coupon();
        c.valid_from = None;
        assert!(
            c.check_redeemable(CouponUsageCounts::default(), dec("100"), Utc::now())
                .is_err()
        );
    }

    #[test]
    fn subtotal_below_minimum_is_rejected_with_reason() {
        let mut c = coupon();
        c.min_order_amount = Some(dec("100.00"));
        let err = c
            .check_redeemable(CouponUsageCounts::default(), dec("50.00"), Utc::now())
            .expect_err("below minimum");
        assert_eq!(err, "minimum order amount is 100.00");
    }

    #[test]
    fn global_usage_cap_is_enforced() {
        let mut c = coupon();
        c.max_uses = Some(5);
        let usage = CouponUsageCounts { total: 5, by_user: 0 };
        assert!(c.check_redeemable(usage, dec("100"), Utc::now()).is_err());
    }

    #[test]
    fn per_user_cap_is_enforced() {
        let mut c = coupon();
        c.per_user_limit = Some(1);
        let usage = CouponUsageCounts { total: 3, by_user: 1 };
        let err = c
            .check_redeemable(usage, dec("100"), Utc::now())
            .expect_err("per-user cap");
        assert!(err.contains("usage limit"));
    }
}
