//! Order repository. Insert-only from checkout, plus read-back for the
//! order routes.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgConnection;

use tamarind_core::{AddressId, CouponId, OrderId, OrderStatus, UserId};

use super::RepositoryError;
use crate::models::{NewOrder, NewOrderItem, Order, OrderItem};

/// Raw order row; status is parsed into [`OrderStatus`] when mapping.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    order_number: String,
    user_id: Option<UserId>,
    is_guest: bool,
    shipping_address_id: AddressId,
    coupon_id: Option<CouponId>,
    coupon_code: String,
    total_amount: rust_decimal::Decimal,
    discount_amount: rust_decimal::Decimal,
    payable_amount: rust_decimal::Decimal,
    payment_method: String,
    notes: String,
    status: String,
    placed_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, RepositoryError> {
        let status: OrderStatus = self
            .status
            .parse()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Order {
            id: self.id,
            order_number: self.order_number,
            user_id: self.user_id,
            is_guest: self.is_guest,
            shipping_address_id: self.shipping_address_id,
            coupon_id: self.coupon_id,
            coupon_code: self.coupon_code,
            total_amount: self.total_amount,
            discount_amount: self.discount_amount,
            payable_amount: self.payable_amount,
            payment_method: self.payment_method,
            notes: self.notes,
            status,
            placed_at: self.placed_at,
        })
    }
}

const ORDER_COLUMNS: &str = r"id, order_number, user_id, is_guest, shipping_address_id,
       coupon_id, coupon_code, total_amount, discount_amount, payable_amount,
       payment_method, notes, status, placed_at";

/// Generate the next order number for `date`, `ORD-YYYYMMDD-XXXXX`.
///
/// Scans the day's highest existing number inside the caller's transaction;
/// the unique index on `order_number` is the backstop if two transactions
/// race to the same sequence (the loser rolls back and can be retried).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn next_order_number(
    conn: &mut PgConnection,
    date: NaiveDate,
) -> Result<String, RepositoryError> {
    let prefix = order_number_prefix(date);

    let last = sqlx::query_scalar::<_, String>(
        r"
        SELECT order_number
        FROM storefront.orders
        WHERE order_number LIKE $1
        ORDER BY order_number DESC
        LIMIT 1
        ",
    )
    .bind(format!("{prefix}%"))
    .fetch_optional(&mut *conn)
    .await?;

    Ok(next_in_sequence(&prefix, last.as_deref()))
}

/// Insert the order row.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the order number already exists,
/// `RepositoryError::Database` for other failures.
pub async fn insert(conn: &mut PgConnection, order: &NewOrder) -> Result<Order, RepositoryError> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        r"
        INSERT INTO storefront.orders
            (order_number, user_id, is_guest, shipping_address_id, coupon_id,
             coupon_code, total_amount, discount_amount, payable_amount,
             payment_method, notes, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'pending')
        RETURNING {ORDER_COLUMNS}
        "
    ))
    .bind(&order.order_number)
    .bind(order.user_id)
    .bind(order.user_id.is_none())
    .bind(order.shipping_address_id)
    .bind(order.coupon_id)
    .bind(&order.coupon_code)
    .bind(order.total_amount)
    .bind(order.discount_amount)
    .bind(order.payable_amount)
    .bind(&order.payment_method)
    .bind(&order.notes)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RepositoryError::Conflict("order number already exists".to_owned())
        }
        _ => RepositoryError::Database(e),
    })?;

    row.into_order()
}

/// Insert one order item per cart line, in cart order.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if an insert fails.
pub async fn insert_items(
    conn: &mut PgConnection,
    order_id: OrderId,
    items: &[NewOrderItem],
) -> Result<Vec<OrderItem>, RepositoryError> {
    let mut inserted = Vec::with_capacity(items.len());

    for item in items {
        let row = sqlx::query_as::<_, OrderItem>(
            r"
            INSERT INTO storefront.order_items
                (order_id, product_id, variant_id, product_name, variant_name,
                 quantity, unit_price, line_total)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, order_id, product_id, variant_id, product_name,
                      variant_name, quantity, unit_price, line_total
            ",
        )
        .bind(order_id)
        .bind(item.product_id)
        .bind(item.variant_id)
        .bind(&item.product_name)
        .bind(&item.variant_name)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.line_total)
        .fetch_one(&mut *conn)
        .await?;

        inserted.push(row);
    }

    Ok(inserted)
}

/// Load an order owned by `user_id` by its order number, with items.
///
/// Guest orders carry no owner reference and cannot be read back through
/// this path.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a query fails.
pub async fn find_by_number_for_user(
    conn: &mut PgConnection,
    user_id: UserId,
    order_number: &str,
) -> Result<Option<(Order, Vec<OrderItem>)>, RepositoryError> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        r"
        SELECT {ORDER_COLUMNS}
        FROM storefront.orders
        WHERE order_number = $1 AND user_id = $2
        "
    ))
    .bind(order_number)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let order = row.into_order()?;

    let items = sqlx::query_as::<_, OrderItem>(
        r"
        SELECT id, order_id, product_id, variant_id, product_name,
               variant_name, quantity, unit_price, line_total
        FROM storefront.order_items
        WHERE order_id = $1
        ORDER BY id
        ",
    )
    .bind(order.id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some((order, items)))
}

/// Day prefix for order numbers: `ORD-YYYYMMDD-`.
fn order_number_prefix(date: NaiveDate) -> String {
    format!("ORD-{}-", date.format("%Y%m%d"))
}

/// Compute the next order number after `last` (the day's current maximum).
///
/// An unparsable stored number restarts the sequence rather than failing
/// checkout; the unique index still prevents duplicates.
fn next_in_sequence(prefix: &str, last: Option<&str>) -> String {
    let next = last
        .and_then(|n| n.strip_prefix(prefix))
        .and_then(|seq| seq.parse::<u32>().ok())
        .map_or(1, |seq| seq + 1);

    format!("{prefix}{next:05}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_embeds_the_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date");
        assert_eq!(order_number_prefix(date), "ORD-20250115-");
    }

    #[test]
    fn first_order_of_the_day() {
        assert_eq!(next_in_sequence("ORD-20250115-", None), "ORD-20250115-00001");
    }

    #[test]
    fn sequence_increments_from_the_day_max() {
        assert_eq!(
            next_in_sequence("ORD-20250115-", Some("ORD-20250115-00041")),
            "ORD-20250115-00042"
        );
    }

    #[test]
    fn garbage_stored_number_restarts_the_sequence() {
        assert_eq!(
            next_in_sequence("ORD-20250115-", Some("ORD-20250115-junk")),
            "ORD-20250115-00001"
        );
    }
}
