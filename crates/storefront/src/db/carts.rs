//! Cart repository.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use tamarind_core::{CartId, CartStatus, Shopper, UserId};

use super::RepositoryError;
use crate::models::{Cart, CartLine};

/// Raw cart row; status is parsed into [`CartStatus`] when mapping.
#[derive(sqlx::FromRow)]
struct CartRow {
    id: CartId,
    user_id: Option<UserId>,
    session_key: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl CartRow {
    fn into_cart(self) -> Result<Cart, RepositoryError> {
        let status: CartStatus = self
            .status
            .parse()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Cart {
            id: self.id,
            user_id: self.user_id,
            session_key: self.session_key,
            status,
            created_at: self.created_at,
        })
    }
}

/// Find the shopper's active cart and lock its row for the transaction.
///
/// `FOR UPDATE` serializes concurrent checkouts of the same cart: the second
/// attempt blocks here until the first commits, then sees a non-active cart.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails, or
/// `RepositoryError::DataCorruption` if the stored status is unknown.
pub async fn find_active(
    conn: &mut PgConnection,
    shopper: &Shopper,
) -> Result<Option<Cart>, RepositoryError> {
    let row = match shopper {
        Shopper::User(user_id) => {
            sqlx::query_as::<_, CartRow>(
                r"
                SELECT id, user_id, session_key, status, created_at
                FROM storefront.carts
                WHERE user_id = $1 AND status = 'active'
                FOR UPDATE
                ",
            )
            .bind(*user_id)
            .fetch_optional(&mut *conn)
            .await?
        }
        Shopper::Guest(session_key) => {
            sqlx::query_as::<_, CartRow>(
                r"
                SELECT id, user_id, session_key, status, created_at
                FROM storefront.carts
                WHERE session_key = $1 AND status = 'active'
                FOR UPDATE
                ",
            )
            .bind(session_key.as_str())
            .fetch_optional(&mut *conn)
            .await?
        }
    };

    row.map(CartRow::into_cart).transpose()
}

/// Load the cart's lines joined with current catalog state.
///
/// The join brings in the variant's active flag and available stock so the
/// validator can check fulfillability without further queries.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn lines(
    conn: &mut PgConnection,
    cart_id: CartId,
) -> Result<Vec<CartLine>, RepositoryError> {
    let lines = sqlx::query_as::<_, CartLine>(
        r"
        SELECT ci.id,
               v.product_id,
               ci.variant_id,
               p.name AS product_name,
               v.name AS variant_name,
               v.is_active AS variant_active,
               COALESCE(i.quantity, 0) AS available_stock,
               ci.quantity,
               ci.unit_price,
               ci.line_total
        FROM storefront.cart_items ci
        JOIN storefront.product_variants v ON v.id = ci.variant_id
        JOIN storefront.products p ON p.id = v.product_id
        LEFT JOIN storefront.inventory i ON i.variant_id = v.id
        WHERE ci.cart_id = $1
        ORDER BY ci.id
        ",
    )
    .bind(cart_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(lines)
}

/// Flip a cart from `active` to `ordered`.
///
/// Guarded by the status predicate: returns `false` when the cart was
/// already consumed, which the orchestrator treats the same as a missing
/// cart so two concurrent checkouts can never both succeed.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn mark_ordered(
    conn: &mut PgConnection,
    cart_id: CartId,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE storefront.carts
        SET status = 'ordered'
        WHERE id = $1 AND status = 'active'
        ",
    )
    .bind(cart_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}
