// src/handlers/posts.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::post::{CreatePostRequest, UpdatePostRequest},
    storage::{NewPost, PostPatch, Store},
    utils::{html::clean_html, ids::parse_id},
};

pub async fn create_post(
    State(store): State<Arc<dyn Store>>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let author_id = parse_id(&payload.author_id)?;

    let id = store
        .create_post(NewPost {
            author_id,
            title: payload.title,
            body: clean_html(&payload.body),
            is_commented: payload.is_commented,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": id.to_string() })),
    ))
}

/// Partial update: only the supplied fields change.
pub async fn update_post(
    State(store): State<Arc<dyn Store>>,
    Path(post_id): Path<String>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let post_id = parse_id(&post_id)?;

    let id = store
        .update_post(PostPatch {
            post_id,
            title: payload.title,
            body: payload.body.as_deref().map(clean_html),
            is_commented: payload.is_commented,
        })
        .await?;

    Ok(Json(serde_json::json!({ "id": id.to_string() })))
}

pub async fn delete_post(
    State(store): State<Arc<dyn Store>>,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let post_id = parse_id(&post_id)?;
    let id = store.delete_post(post_id).await?;

    Ok(Json(serde_json::json!({ "id": id.to_string() })))
}

/// List the user's non-deleted posts, newest update first, with derived
/// like/dislike counts.
pub async fn list_posts(
    State(store): State<Arc<dyn Store>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_id(&user_id)?;
    let posts = store.get_posts(user_id).await?;

    Ok(Json(posts))
}
