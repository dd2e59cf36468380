//! Coupon repository. Read-only: the usage ledger is written through the
//! deferred `CouponUsageHook`, not here.

use sqlx::PgConnection;

use tamarind_core::{CouponId, UserId};

use super::RepositoryError;
use crate::models::{Coupon, CouponUsageCounts};

/// Look up a coupon by its code.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_by_code(
    conn: &mut PgConnection,
    code: &str,
) -> Result<Option<Coupon>, RepositoryError> {
    let coupon = sqlx::query_as::<_, Coupon>(
        r"
        SELECT id, code, active, discount_percent, discount_amount,
               max_discount, min_order_amount, max_uses, per_user_limit,
               valid_from, valid_to
        FROM storefront.coupons
        WHERE code = $1
        ",
    )
    .bind(code)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(coupon)
}

/// Read recorded usage counts for a coupon.
///
/// `by_user` counts redemptions by the given user and is zero when the
/// requester is a guest (NULL never matches the filter).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn usage_counts(
    conn: &mut PgConnection,
    coupon_id: CouponId,
    user_id: Option<UserId>,
) -> Result<CouponUsageCounts, RepositoryError> {
    let (total, by_user) = sqlx::query_as::<_, (i64, i64)>(
        r"
        SELECT COUNT(*),
               COUNT(*) FILTER (WHERE user_id = $2)
        FROM storefront.coupon_usage
        WHERE coupon_id = $1
        ",
    )
    .bind(coupon_id)
    .bind(user_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(CouponUsageCounts { total, by_user })
}
