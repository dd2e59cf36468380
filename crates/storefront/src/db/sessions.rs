//! Session-token lookups backing the principal extractor.

use sqlx::PgConnection;

use tamarind_core::UserId;

use super::RepositoryError;

/// Resolve a bearer token to its user, if the session exists and has not
/// expired.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_user_by_token(
    conn: &mut PgConnection,
    token: &str,
) -> Result<Option<UserId>, RepositoryError> {
    let user_id = sqlx::query_scalar::<_, UserId>(
        r"
        SELECT user_id
        FROM storefront.sessions
        WHERE token = $1 AND expires_at > NOW()
        ",
    )
    .bind(token)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(user_id)
}
