use crate::models::DbAuthSession;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Resolves an opaque bearer token to a stable user id, or `None` when the
/// token is unknown. Session issuance belongs to the auth collaborator.
pub async fn resolve_session(pool: &Pool<Postgres>, token: &str) -> Result<Option<Uuid>> {
    let session = sqlx::query_as::<_, DbAuthSession>(
        r#"
        SELECT token, user_id, created_at
        FROM auth_sessions
        WHERE token = $1
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(session.map(|s| s.user_id))
}

/// Registers a session token for a user. Used by the seed binary and tests;
/// production tokens arrive through the auth collaborator.
pub async fn create_session(
    pool: &Pool<Postgres>,
    token: &str,
    user_id: Uuid,
) -> Result<DbAuthSession> {
    let now = Utc::now();

    tracing::debug!("Creating session for user_id={}", user_id);

    let session = sqlx::query_as::<_, DbAuthSession>(
        r#"
        INSERT INTO auth_sessions (token, user_id, created_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (token) DO UPDATE SET user_id = $2
        RETURNING token, user_id, created_at
        "#,
    )
    .bind(token)
    .bind(user_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(session)
}
