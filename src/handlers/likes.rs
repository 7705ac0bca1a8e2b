// src/handlers/likes.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::like::LikeRequest,
    storage::Store,
    utils::ids::parse_id,
};

/// Toggle the caller's reaction on a post: same vote clears it, opposite
/// vote flips it.
pub async fn toggle_post_like(
    State(store): State<Arc<dyn Store>>,
    Path(post_id): Path<String>,
    Json(payload): Json<LikeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let post_id = parse_id(&post_id)?;
    let actor_id = parse_id(&payload.user_id)?;

    store
        .upd_post_likes(actor_id, post_id, payload.is_like)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_post_likes(
    State(store): State<Arc<dyn Store>>,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let post_id = parse_id(&post_id)?;
    let counts = store.get_post_likes(post_id).await?;

    Ok(Json(counts))
}

pub async fn toggle_comment_like(
    State(store): State<Arc<dyn Store>>,
    Path(comment_id): Path<String>,
    Json(payload): Json<LikeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let comment_id = parse_id(&comment_id)?;
    let actor_id = parse_id(&payload.user_id)?;

    store
        .upd_comment_likes(actor_id, comment_id, payload.is_like)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_comment_likes(
    State(store): State<Arc<dyn Store>>,
    Path(comment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let comment_id = parse_id(&comment_id)?;
    let counts = store.get_comment_likes(comment_id).await?;

    Ok(Json(counts))
}
