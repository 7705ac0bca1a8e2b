// src/handlers/comments.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::comment::{CommentListParams, CreateCommentRequest, UpdateCommentRequest},
    storage::{NewComment, Store},
    utils::{html::clean_html, ids::parse_id},
};

pub async fn create_comment(
    State(store): State<Arc<dyn Store>>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let post_id = parse_id(&payload.post_id)?;
    let author_id = parse_id(&payload.author_id)?;
    // Absent parent means a root comment (parent 0).
    let parent_id = match &payload.parent_id {
        Some(raw) => parse_id(raw)?,
        None => 0,
    };

    let id = store
        .create_comment(NewComment {
            post_id,
            author_id,
            parent_id,
            body: clean_html(&payload.body),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": id.to_string() })),
    ))
}

pub async fn update_comment(
    State(store): State<Arc<dyn Store>>,
    Path(comment_id): Path<String>,
    Json(payload): Json<UpdateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let comment_id = parse_id(&comment_id)?;

    let id = store
        .update_comment(comment_id, clean_html(&payload.body))
        .await?;

    Ok(Json(serde_json::json!({ "id": id.to_string() })))
}

pub async fn delete_comment(
    State(store): State<Arc<dyn Store>>,
    Path(comment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let comment_id = parse_id(&comment_id)?;
    let id = store.delete_comment(comment_id).await?;

    Ok(Json(serde_json::json!({ "id": id.to_string() })))
}

/// One page of the post's comment thread: root comments under `parent_id`
/// (0 or absent for top level), each optionally followed by its single
/// earliest visible reply.
pub async fn list_comments(
    State(store): State<Arc<dyn Store>>,
    Path(post_id): Path<String>,
    Query(params): Query<CommentListParams>,
) -> Result<impl IntoResponse, AppError> {
    let post_id = parse_id(&post_id)?;
    let parent_id = match &params.parent_id {
        Some(raw) => parse_id(raw)?,
        None => 0,
    };
    let page = params.page.unwrap_or(0);
    if page < 0 {
        return Err(AppError::BadRequest("page must be non-negative".to_string()));
    }
    let per_page = params.per_page.unwrap_or(0);

    let comments = store
        .get_comments(post_id, parent_id, page, per_page)
        .await?;

    Ok(Json(comments))
}
