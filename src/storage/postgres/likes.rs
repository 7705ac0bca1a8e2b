// src/storage/postgres/likes.rs
//
// Reaction toggles are read-modify-write over the (actor, target) entry, so
// each one runs in a transaction that first locks the target row with
// SELECT ... FOR UPDATE. That lock serializes concurrent toggles on the same
// target and doubles as the target-exists check. The transition itself comes
// from storage::shared::toggle, shared with the in-process backend.

use sqlx::{PgPool, Postgres, Row, Transaction};

use crate::error::AppError;
use crate::models::like::LikeCounts;
use crate::storage::shared;

pub(super) async fn upd_post_likes(
    pool: &PgPool,
    actor_id: i64,
    post_id: i64,
    is_like: bool,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT 1 FROM posts WHERE id = $1 FOR UPDATE")
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

    let current = sqlx::query("SELECT is_like FROM post_likes WHERE author_id = $1 AND post_id = $2")
        .bind(actor_id)
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await?
        .map(|row| row.try_get::<bool, _>("is_like"))
        .transpose()?;

    apply(
        &mut tx,
        "post_likes",
        "post_id",
        actor_id,
        post_id,
        current,
        is_like,
    )
    .await?;

    tx.commit().await?;
    Ok(())
}

pub(super) async fn upd_comment_likes(
    pool: &PgPool,
    actor_id: i64,
    comment_id: i64,
    is_like: bool,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT 1 FROM comments WHERE id = $1 FOR UPDATE")
        .bind(comment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;

    let current =
        sqlx::query("SELECT is_like FROM comment_likes WHERE author_id = $1 AND comment_id = $2")
            .bind(actor_id)
            .bind(comment_id)
            .fetch_optional(&mut *tx)
            .await?
            .map(|row| row.try_get::<bool, _>("is_like"))
            .transpose()?;

    apply(
        &mut tx,
        "comment_likes",
        "comment_id",
        actor_id,
        comment_id,
        current,
        is_like,
    )
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Apply one transition of the toggle state machine to the reaction table.
async fn apply(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
    target_col: &str,
    actor_id: i64,
    target_id: i64,
    current: Option<bool>,
    is_like: bool,
) -> Result<(), AppError> {
    match (shared::toggle(current, is_like), current) {
        // same vote resubmitted: the reaction goes away
        (None, _) => {
            sqlx::query(&format!(
                "DELETE FROM {table} WHERE author_id = $1 AND {target_col} = $2"
            ))
            .bind(actor_id)
            .bind(target_id)
            .execute(&mut **tx)
            .await?;
        }
        // opposite vote: flip in place
        (Some(value), Some(_)) => {
            sqlx::query(&format!(
                "UPDATE {table} SET is_like = $3 WHERE author_id = $1 AND {target_col} = $2"
            ))
            .bind(actor_id)
            .bind(target_id)
            .bind(value)
            .execute(&mut **tx)
            .await?;
        }
        // first vote
        (Some(value), None) => {
            sqlx::query(&format!(
                "INSERT INTO {table} (author_id, {target_col}, is_like) VALUES ($1, $2, $3)"
            ))
            .bind(actor_id)
            .bind(target_id)
            .bind(value)
            .execute(&mut **tx)
            .await?;
        }
    }
    Ok(())
}

pub(super) async fn get_post_likes(pool: &PgPool, post_id: i64) -> Result<LikeCounts, AppError> {
    sqlx::query("SELECT 1 FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

    let counts = sqlx::query_as::<_, LikeCounts>(
        "SELECT COUNT(*) FILTER (WHERE is_like) AS likes,
                COUNT(*) FILTER (WHERE NOT is_like) AS dislikes
         FROM post_likes
         WHERE post_id = $1",
    )
    .bind(post_id)
    .fetch_one(pool)
    .await?;

    Ok(counts)
}

pub(super) async fn get_comment_likes(
    pool: &PgPool,
    comment_id: i64,
) -> Result<LikeCounts, AppError> {
    sqlx::query("SELECT 1 FROM comments WHERE id = $1")
        .bind(comment_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;

    let counts = sqlx::query_as::<_, LikeCounts>(
        "SELECT COUNT(*) FILTER (WHERE is_like) AS likes,
                COUNT(*) FILTER (WHERE NOT is_like) AS dislikes
         FROM comment_likes
         WHERE comment_id = $1",
    )
    .bind(comment_id)
    .fetch_one(pool)
    .await?;

    Ok(counts)
}
