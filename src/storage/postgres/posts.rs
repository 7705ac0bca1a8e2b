// src/storage/postgres/posts.rs

use sqlx::{PgPool, Row};

use crate::error::AppError;
use crate::models::post::PostView;
use crate::storage::{NewPost, PostPatch};

pub(super) async fn create_post(pool: &PgPool, input: NewPost) -> Result<i64, AppError> {
    // The author FK doubles as the existence check; a violation maps to
    // NotFound.
    let row = sqlx::query(
        "INSERT INTO posts (author_id, title, body, is_commented)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(input.author_id)
    .bind(&input.title)
    .bind(&input.body)
    .bind(input.is_commented)
    .fetch_one(pool)
    .await?;

    Ok(row.try_get("id")?)
}

/// Partial update. COALESCE keeps the stored value wherever the patch field
/// is NULL; an empty string is a regular value. A soft-deleted post counts
/// as absent.
pub(super) async fn update_post(pool: &PgPool, patch: PostPatch) -> Result<i64, AppError> {
    let row = sqlx::query(
        "UPDATE posts
         SET title = COALESCE($2, title),
             body = COALESCE($3, body),
             is_commented = COALESCE($4, is_commented),
             upd_date = now()
         WHERE id = $1 AND is_deleted = FALSE
         RETURNING id",
    )
    .bind(patch.post_id)
    .bind(patch.title)
    .bind(patch.body)
    .bind(patch.is_commented)
    .fetch_one(pool)
    .await?;

    Ok(row.try_get("id")?)
}

pub(super) async fn delete_post(pool: &PgPool, post_id: i64) -> Result<i64, AppError> {
    let row = sqlx::query(
        "UPDATE posts
         SET is_deleted = TRUE, upd_date = now()
         WHERE id = $1 AND is_deleted = FALSE
         RETURNING id",
    )
    .bind(post_id)
    .fetch_one(pool)
    .await?;

    Ok(row.try_get("id")?)
}

/// All non-deleted posts of the user, newest update first, with like/dislike
/// counts aggregated from the reaction set.
pub(super) async fn get_posts(pool: &PgPool, user_id: i64) -> Result<Vec<PostView>, AppError> {
    sqlx::query("SELECT 1 FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    let posts = sqlx::query_as::<_, PostView>(
        "SELECT p.id, p.author_id, p.title, p.body, p.is_commented,
                p.create_date, p.upd_date,
                (SELECT COUNT(*) FROM post_likes l
                 WHERE l.post_id = p.id AND l.is_like) AS likes,
                (SELECT COUNT(*) FROM post_likes l
                 WHERE l.post_id = p.id AND NOT l.is_like) AS dislikes
         FROM posts p
         WHERE p.author_id = $1 AND p.is_deleted = FALSE
         ORDER BY p.upd_date DESC, p.id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}
