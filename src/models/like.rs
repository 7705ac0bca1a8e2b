// src/models/like.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Derived like/dislike counters for one post or comment. Always equal to
/// the number of active reactions with the corresponding value; both zero
/// when the target has no reactions.
#[derive(Debug, Clone, Copy, Default, FromRow, Serialize)]
pub struct LikeCounts {
    pub likes: i64,
    pub dislikes: i64,
}

/// DTO for toggling a reaction on a post or comment.
///
/// Resubmitting the same value clears the reaction; submitting the opposite
/// value flips it.
#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    pub user_id: String,
    pub is_like: bool,
}
