//! Address repository.

use sqlx::PgConnection;

use tamarind_core::{AddressId, UserId};

use super::RepositoryError;
use crate::models::{Address, NewAddress};

/// Look up an address by ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find(
    conn: &mut PgConnection,
    id: AddressId,
) -> Result<Option<Address>, RepositoryError> {
    let address = sqlx::query_as::<_, Address>(
        r"
        SELECT id, user_id, name, phone, full_address, country, district,
               postal_code, email, is_default, created_at
        FROM storefront.addresses
        WHERE id = $1
        ",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(address)
}

/// Insert a new address owned by `owner` (or nobody, for guests).
///
/// Runs on the caller's connection so an insert inside the checkout
/// transaction rolls back with it.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert(
    conn: &mut PgConnection,
    owner: Option<UserId>,
    address: &NewAddress,
) -> Result<Address, RepositoryError> {
    let address = sqlx::query_as::<_, Address>(
        r"
        INSERT INTO storefront.addresses
            (user_id, name, phone, full_address, country, district,
             postal_code, email, is_default)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, user_id, name, phone, full_address, country, district,
                  postal_code, email, is_default, created_at
        ",
    )
    .bind(owner)
    .bind(&address.name)
    .bind(&address.phone)
    .bind(&address.full_address)
    .bind(&address.country)
    .bind(&address.district)
    .bind(&address.postal_code)
    .bind(&address.email)
    .bind(address.is_default)
    .fetch_one(&mut *conn)
    .await?;

    Ok(address)
}
