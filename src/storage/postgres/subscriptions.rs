// src/storage/postgres/subscriptions.rs

use sqlx::{PgPool, Row};

use crate::error::AppError;

/// Create or reactivate the (user, post) subscription. The upsert leaves
/// the pending fan-out rows alone, so reactivation keeps whatever
/// accumulated while the subscription was deleted.
pub(super) async fn create_subscription(
    pool: &PgPool,
    user_id: i64,
    post_id: i64,
) -> Result<i64, AppError> {
    let row = sqlx::query(
        "INSERT INTO subscriptions (user_id, post_id)
         VALUES ($1, $2)
         ON CONFLICT (user_id, post_id) DO UPDATE
         SET is_deleted = FALSE, upd_date = now()
         RETURNING id",
    )
    .bind(user_id)
    .bind(post_id)
    .fetch_one(pool)
    .await?;

    Ok(row.try_get("id")?)
}

/// Mark the subscription deleted and clear its pending list, in one
/// transaction.
pub(super) async fn delete_subscription(
    pool: &PgPool,
    user_id: i64,
    post_id: i64,
) -> Result<i64, AppError> {
    let mut tx = pool.begin().await?;

    let id: i64 = sqlx::query(
        "UPDATE subscriptions
         SET is_deleted = TRUE, upd_date = now()
         WHERE user_id = $1 AND post_id = $2
         RETURNING id",
    )
    .bind(user_id)
    .bind(post_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("subscription not found".to_string()))?
    .try_get("id")?;

    sqlx::query("DELETE FROM new_comments WHERE subscription_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(id)
}

/// Existence gate: succeeds only for an active (non-deleted) subscription.
pub(super) async fn check_subscription(
    pool: &PgPool,
    user_id: i64,
    post_id: i64,
) -> Result<(), AppError> {
    sqlx::query(
        "SELECT 1 FROM subscriptions
         WHERE user_id = $1 AND post_id = $2 AND is_deleted = FALSE",
    )
    .bind(user_id)
    .bind(post_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("subscription not found".to_string()))?;

    Ok(())
}

/// Consume-once counter: return the pending new-comment count and empty the
/// list atomically. The subscription row must exist for the pair, active or
/// deleted; locking it serializes concurrent drains.
pub(super) async fn drain_new_comments(
    pool: &PgPool,
    user_id: i64,
    post_id: i64,
) -> Result<i64, AppError> {
    let mut tx = pool.begin().await?;

    let id: i64 = sqlx::query(
        "SELECT id FROM subscriptions
         WHERE user_id = $1 AND post_id = $2
         FOR UPDATE",
    )
    .bind(user_id)
    .bind(post_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("subscription not found".to_string()))?
    .try_get("id")?;

    let drained = sqlx::query("DELETE FROM new_comments WHERE subscription_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    Ok(drained as i64)
}
