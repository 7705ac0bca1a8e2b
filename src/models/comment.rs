// src/models/comment.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::utils::ids::id_to_string;

/// One row of a paginated thread page: either a root comment or the single
/// preview reply rendered directly under its root.
///
/// `parent_id` is 0 for root comments. `child_count` is the number of direct
/// children (callers use it to decide whether "view replies" is offered).
/// A deleted comment that is still visible carries the placeholder body.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentView {
    #[serde(serialize_with = "id_to_string")]
    pub id: i64,
    #[serde(serialize_with = "id_to_string")]
    pub post_id: i64,
    #[serde(serialize_with = "id_to_string")]
    pub parent_id: i64,
    #[serde(serialize_with = "id_to_string")]
    pub author_id: i64,
    pub login: String,
    pub body: String,
    pub create_date: chrono::DateTime<chrono::Utc>,
    pub upd_date: chrono::DateTime<chrono::Utc>,
    pub likes: i64,
    pub dislikes: i64,
    pub child_count: i64,
}

/// DTO for creating a new comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub post_id: String,
    pub author_id: String,

    /// Optional: the ID of the comment being replied to. Absent (or "0")
    /// means a root comment.
    pub parent_id: Option<String>,

    #[validate(length(
        min = 1,
        max = 1000,
        message = "Comment must be between 1 and 1000 characters"
    ))]
    pub body: String,
}

/// DTO for replacing a comment's body.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 1000))]
    pub body: String,
}

/// Query parameters for the paginated thread read.
#[derive(Debug, Deserialize)]
pub struct CommentListParams {
    /// Root level when absent or "0"; otherwise the comment whose replies
    /// are being paged through.
    pub parent_id: Option<String>,

    /// Zero-based page number (default: 0).
    pub page: Option<i64>,

    /// Page size (default: 10; 0 also means 10).
    pub per_page: Option<i64>,
}
