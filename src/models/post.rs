// src/models/post.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::utils::ids::id_to_string;

/// A post as returned by the store's read paths, annotated with its
/// like/dislike counts derived from the reaction set.
///
/// Id fields serialize as decimal strings (the wire representation).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostView {
    #[serde(serialize_with = "id_to_string")]
    pub id: i64,
    #[serde(serialize_with = "id_to_string")]
    pub author_id: i64,
    pub title: String,
    pub body: String,
    pub is_commented: bool,
    pub create_date: chrono::DateTime<chrono::Utc>,
    pub upd_date: chrono::DateTime<chrono::Utc>,
    pub likes: i64,
    pub dislikes: i64,
}

/// DTO for creating a new post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    pub author_id: String,

    #[validate(length(
        min = 1,
        max = 100,
        message = "Title length must be between 1 and 100 chars"
    ))]
    pub title: String,

    #[validate(length(
        min = 1,
        max = 10000,
        message = "Body length must be between 1 and 10000 chars"
    ))]
    pub body: String,

    pub is_commented: bool,
}

/// DTO for partially updating a post. Absent fields are left unchanged;
/// an empty string is a regular value, not "unset".
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 10000))]
    pub body: Option<String>,

    pub is_commented: Option<bool>,
}
