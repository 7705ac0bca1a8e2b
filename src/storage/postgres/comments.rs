// src/storage/postgres/comments.rs

use sqlx::{PgPool, Row};

use crate::error::AppError;
use crate::models::comment::CommentView;
use crate::storage::NewComment;
use crate::storage::shared::{self, DELETED_BODY};

/// Insert a comment and fan its id out to the pending list of every active
/// subscriber of the post, in one transaction.
pub(super) async fn create_comment(pool: &PgPool, input: NewComment) -> Result<i64, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT 1 FROM posts WHERE id = $1")
        .bind(input.post_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

    if input.parent_id != 0 {
        sqlx::query("SELECT 1 FROM comments WHERE id = $1 AND post_id = $2")
            .bind(input.parent_id)
            .bind(input.post_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("parent comment not found".to_string()))?;
    }

    // NULLIF turns the wire's 0-means-root into a NULL parent.
    let comment_id: i64 = sqlx::query(
        "INSERT INTO comments (post_id, parent_id, author_id, body)
         VALUES ($1, NULLIF($2, 0), $3, $4)
         RETURNING id",
    )
    .bind(input.post_id)
    .bind(input.parent_id)
    .bind(input.author_id)
    .bind(&input.body)
    .fetch_one(&mut *tx)
    .await?
    .try_get("id")?;

    sqlx::query(
        "INSERT INTO new_comments (subscription_id, comment_id)
         SELECT s.id, $2
         FROM subscriptions s
         WHERE s.post_id = $1 AND s.is_deleted = FALSE",
    )
    .bind(input.post_id)
    .bind(comment_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(comment_id)
}

pub(super) async fn update_comment(
    pool: &PgPool,
    comment_id: i64,
    body: String,
) -> Result<i64, AppError> {
    let row = sqlx::query(
        "UPDATE comments
         SET body = $2, upd_date = now()
         WHERE id = $1 AND is_deleted = FALSE
         RETURNING id",
    )
    .bind(comment_id)
    .bind(body)
    .fetch_one(pool)
    .await?;

    Ok(row.try_get("id")?)
}

/// Logical delete. The record never goes away; child sets are computed over
/// non-deleted rows, so the deleted comment drops out of its parent's child
/// set while its own children stay reachable under it.
pub(super) async fn delete_comment(pool: &PgPool, comment_id: i64) -> Result<i64, AppError> {
    let row = sqlx::query(
        "UPDATE comments
         SET is_deleted = TRUE, upd_date = now()
         WHERE id = $1 AND is_deleted = FALSE
         RETURNING id",
    )
    .bind(comment_id)
    .fetch_one(pool)
    .await?;

    Ok(row.try_get("id")?)
}

/// One page of root comments under `parent_id`, each followed by its single
/// earliest visible reply. Mirrors the in-process algorithm exactly:
///
/// 1. candidate roots at this level, hidden rows (deleted with no live
///    children) excluded, ordered by (create_date, id);
/// 2. the page window over that order (ROW_NUMBER);
/// 3. per root, the earliest live child as a preview row (DISTINCT ON);
/// 4. deleted-but-visible rows render the placeholder body.
pub(super) async fn get_comments(
    pool: &PgPool,
    post_id: i64,
    parent_id: i64,
    page: i64,
    per_page: i64,
) -> Result<Vec<CommentView>, AppError> {
    sqlx::query("SELECT 1 FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

    let per_page = shared::normalize_per_page(per_page);
    // saturate instead of overflowing for absurd page numbers; the row
    // numbers below can never exceed the comment count, so a saturated
    // window simply selects nothing.
    let window_start = page.max(0).saturating_mul(per_page);
    let window_end = window_start.saturating_add(per_page);

    let comments = sqlx::query_as::<_, CommentView>(
        "WITH child_counts AS (
             SELECT parent_id, COUNT(*) AS cnt
             FROM comments
             WHERE post_id = $1 AND parent_id IS NOT NULL AND is_deleted = FALSE
             GROUP BY parent_id
         ),
         roots AS (
             SELECT c.id, c.post_id, COALESCE(c.parent_id, 0) AS parent_id,
                    c.author_id,
                    CASE WHEN c.is_deleted THEN $5 ELSE c.body END AS body,
                    c.create_date, c.upd_date,
                    COALESCE(cc.cnt, 0) AS child_count,
                    ROW_NUMBER() OVER (ORDER BY c.create_date, c.id) AS rn
             FROM comments c
             LEFT JOIN child_counts cc ON cc.parent_id = c.id
             WHERE c.post_id = $1
               AND COALESCE(c.parent_id, 0) = $2
               AND NOT (c.is_deleted AND COALESCE(cc.cnt, 0) = 0)
         ),
         page AS (
             SELECT * FROM roots WHERE rn > $3 AND rn <= $4
         ),
         previews AS (
             SELECT DISTINCT ON (c.parent_id)
                    c.id, c.post_id, c.parent_id, c.author_id, c.body,
                    c.create_date, c.upd_date,
                    COALESCE(cc.cnt, 0) AS child_count
             FROM comments c
             JOIN page p ON c.parent_id = p.id
             LEFT JOIN child_counts cc ON cc.parent_id = c.id
             WHERE c.is_deleted = FALSE
             ORDER BY c.parent_id, c.create_date, c.id
         )
         SELECT t.id, t.post_id, t.parent_id, t.author_id, u.login, t.body,
                t.create_date, t.upd_date,
                (SELECT COUNT(*) FROM comment_likes l
                 WHERE l.comment_id = t.id AND l.is_like) AS likes,
                (SELECT COUNT(*) FROM comment_likes l
                 WHERE l.comment_id = t.id AND NOT l.is_like) AS dislikes,
                t.child_count
         FROM (
             SELECT p.id, p.post_id, p.parent_id, p.author_id, p.body,
                    p.create_date, p.upd_date, p.child_count,
                    p.rn AS root_rn, 1 AS lvl
             FROM page p
             UNION ALL
             SELECT v.id, v.post_id, v.parent_id, v.author_id, v.body,
                    v.create_date, v.upd_date, v.child_count,
                    p.rn AS root_rn, 2 AS lvl
             FROM previews v
             JOIN page p ON v.parent_id = p.id
         ) t
         JOIN users u ON u.id = t.author_id
         ORDER BY t.root_rn, t.lvl",
    )
    .bind(post_id)
    .bind(parent_id)
    .bind(window_start)
    .bind(window_end)
    .bind(DELETED_BODY)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}
