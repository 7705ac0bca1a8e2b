// src/storage/postgres/mod.rs
//
// Relational backend over sqlx/Postgres. Single-statement mutations run on
// the pool directly; every mutation that touches more than one table (or
// needs a read-modify-write, like the reaction toggle) runs inside one
// transaction so a mid-sequence failure rolls back without partial writes.

mod comments;
mod likes;
mod posts;
mod subscriptions;
mod users;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{comment::CommentView, like::LikeCounts, post::PostView};
use crate::storage::{NewComment, NewPost, NewUser, PostPatch, Store};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, input: NewUser) -> Result<i64, AppError> {
        users::create_user(&self.pool, input).await
    }

    async fn create_post(&self, input: NewPost) -> Result<i64, AppError> {
        posts::create_post(&self.pool, input).await
    }

    async fn update_post(&self, patch: PostPatch) -> Result<i64, AppError> {
        posts::update_post(&self.pool, patch).await
    }

    async fn delete_post(&self, post_id: i64) -> Result<i64, AppError> {
        posts::delete_post(&self.pool, post_id).await
    }

    async fn get_posts(&self, user_id: i64) -> Result<Vec<PostView>, AppError> {
        posts::get_posts(&self.pool, user_id).await
    }

    async fn create_comment(&self, input: NewComment) -> Result<i64, AppError> {
        comments::create_comment(&self.pool, input).await
    }

    async fn update_comment(&self, comment_id: i64, body: String) -> Result<i64, AppError> {
        comments::update_comment(&self.pool, comment_id, body).await
    }

    async fn delete_comment(&self, comment_id: i64) -> Result<i64, AppError> {
        comments::delete_comment(&self.pool, comment_id).await
    }

    async fn get_comments(
        &self,
        post_id: i64,
        parent_id: i64,
        page: i64,
        per_page: i64,
    ) -> Result<Vec<CommentView>, AppError> {
        comments::get_comments(&self.pool, post_id, parent_id, page, per_page).await
    }

    async fn upd_post_likes(
        &self,
        actor_id: i64,
        post_id: i64,
        is_like: bool,
    ) -> Result<(), AppError> {
        likes::upd_post_likes(&self.pool, actor_id, post_id, is_like).await
    }

    async fn upd_comment_likes(
        &self,
        actor_id: i64,
        comment_id: i64,
        is_like: bool,
    ) -> Result<(), AppError> {
        likes::upd_comment_likes(&self.pool, actor_id, comment_id, is_like).await
    }

    async fn get_post_likes(&self, post_id: i64) -> Result<LikeCounts, AppError> {
        likes::get_post_likes(&self.pool, post_id).await
    }

    async fn get_comment_likes(&self, comment_id: i64) -> Result<LikeCounts, AppError> {
        likes::get_comment_likes(&self.pool, comment_id).await
    }

    async fn create_subscription(&self, user_id: i64, post_id: i64) -> Result<i64, AppError> {
        subscriptions::create_subscription(&self.pool, user_id, post_id).await
    }

    async fn delete_subscription(&self, user_id: i64, post_id: i64) -> Result<i64, AppError> {
        subscriptions::delete_subscription(&self.pool, user_id, post_id).await
    }

    async fn check_subscription(&self, user_id: i64, post_id: i64) -> Result<(), AppError> {
        subscriptions::check_subscription(&self.pool, user_id, post_id).await
    }

    async fn drain_new_comments(&self, user_id: i64, post_id: i64) -> Result<i64, AppError> {
        subscriptions::drain_new_comments(&self.pool, user_id, post_id).await
    }
}
