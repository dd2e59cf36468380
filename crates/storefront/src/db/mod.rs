//! Database operations for storefront `PostgreSQL`.
//!
//! # Tables (schema `storefront`)
//!
//! - `users` / `sessions` - minimal principal context for the extractor
//! - `addresses` - shipping addresses, guest-owned rows have NULL user_id
//! - `products` / `product_variants` / `inventory` - read-only catalog
//! - `carts` / `cart_items` - one active cart per owner
//! - `coupons` / `coupon_usage` - read-only coupon state and its ledger
//! - `orders` / `order_items` - insert-only, written by checkout
//!
//! # Query style
//!
//! Queries use the runtime API (`query_as` + `FromRow`) rather than the
//! compile-time macros, so the crate builds without a reachable database.
//! Functions take `&mut PgConnection` so the checkout transaction can
//! compose repository calls on a single connection.
//!
//! # Migrations
//!
//! Migrations live in `crates/storefront/migrations/` and are embedded via
//! `sqlx::migrate!`; set `STOREFRONT_RUN_MIGRATIONS=true` to apply them at
//! startup.

pub mod addresses;
pub mod carts;
pub mod coupons;
pub mod orders;
pub mod sessions;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Embedded migrations for the storefront schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., duplicate order number).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Apply pending migrations.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails; a failed
/// migration leaves the schema at the last committed version.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}
