// src/storage/mod.rs

pub mod memory;
pub mod postgres;
pub mod shared;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{comment::CommentView, like::LikeCounts, post::PostView};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Input for `Store::create_user`. Fields are assumed to have passed
/// field-format validation at the boundary.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub login: String,
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: i64,
    pub title: String,
    pub body: String,
    pub is_commented: bool,
}

/// Partial update: `None` leaves the field unchanged. An empty string is a
/// regular value.
#[derive(Debug, Clone)]
pub struct PostPatch {
    pub post_id: i64,
    pub title: Option<String>,
    pub body: Option<String>,
    pub is_commented: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i64,
    pub author_id: i64,
    /// 0 means a root comment.
    pub parent_id: i64,
    pub body: String,
}

/// The abstract content-graph store contract. Two conforming backends exist:
/// [`MemoryStore`] (one reader/writer lock over an arena of entities) and
/// [`PgStore`] (one transaction per multi-write mutation). Both must answer
/// every read with identical results for identical histories.
///
/// All identifiers are integers here; the transport boundary owns the
/// decimal-string wire conversion. Soft-deleted rows count as absent when
/// they are the target of an update or delete.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, input: NewUser) -> Result<i64, AppError>;

    async fn create_post(&self, input: NewPost) -> Result<i64, AppError>;
    async fn update_post(&self, patch: PostPatch) -> Result<i64, AppError>;
    async fn delete_post(&self, post_id: i64) -> Result<i64, AppError>;
    /// All non-deleted posts owned by the user, newest update first.
    async fn get_posts(&self, user_id: i64) -> Result<Vec<PostView>, AppError>;

    async fn create_comment(&self, input: NewComment) -> Result<i64, AppError>;
    async fn update_comment(&self, comment_id: i64, body: String) -> Result<i64, AppError>;
    async fn delete_comment(&self, comment_id: i64) -> Result<i64, AppError>;
    /// One page of root comments under `parent_id` for the post, each root
    /// optionally followed by its single earliest visible reply.
    async fn get_comments(
        &self,
        post_id: i64,
        parent_id: i64,
        page: i64,
        per_page: i64,
    ) -> Result<Vec<CommentView>, AppError>;

    async fn upd_post_likes(&self, actor_id: i64, post_id: i64, is_like: bool)
    -> Result<(), AppError>;
    async fn upd_comment_likes(
        &self,
        actor_id: i64,
        comment_id: i64,
        is_like: bool,
    ) -> Result<(), AppError>;
    async fn get_post_likes(&self, post_id: i64) -> Result<LikeCounts, AppError>;
    async fn get_comment_likes(&self, comment_id: i64) -> Result<LikeCounts, AppError>;

    /// Creates the subscription, or reactivates it if it was deleted. The
    /// pending list survives an unsubscribe/resubscribe cycle untouched.
    async fn create_subscription(&self, user_id: i64, post_id: i64) -> Result<i64, AppError>;
    /// Marks the subscription deleted and clears its pending list.
    async fn delete_subscription(&self, user_id: i64, post_id: i64) -> Result<i64, AppError>;
    /// Succeeds iff an active (non-deleted) subscription exists.
    async fn check_subscription(&self, user_id: i64, post_id: i64) -> Result<(), AppError>;
    /// Returns the pending new-comment count and atomically empties it.
    /// Requires a subscription row for the pair, active or deleted.
    async fn drain_new_comments(&self, user_id: i64, post_id: i64) -> Result<i64, AppError>;
}
