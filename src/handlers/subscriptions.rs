// src/handlers/subscriptions.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::subscription::SubscriptionRequest,
    storage::Store,
    utils::ids::parse_id,
};

pub async fn create_subscription(
    State(store): State<Arc<dyn Store>>,
    Json(payload): Json<SubscriptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_id(&payload.user_id)?;
    let post_id = parse_id(&payload.post_id)?;

    let id = store.create_subscription(user_id, post_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": id.to_string() })),
    ))
}

pub async fn delete_subscription(
    State(store): State<Arc<dyn Store>>,
    Query(params): Query<SubscriptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_id(&params.user_id)?;
    let post_id = parse_id(&params.post_id)?;

    let id = store.delete_subscription(user_id, post_id).await?;

    Ok(Json(serde_json::json!({ "id": id.to_string() })))
}

/// Existence gate used before draining: 204 iff an active subscription
/// exists for the pair.
pub async fn check_subscription(
    State(store): State<Arc<dyn Store>>,
    Query(params): Query<SubscriptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_id(&params.user_id)?;
    let post_id = parse_id(&params.post_id)?;

    store.check_subscription(user_id, post_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Consume-once read of the pending new-comment count; an immediate second
/// call returns 0.
pub async fn drain_new_comments(
    State(store): State<Arc<dyn Store>>,
    Json(payload): Json<SubscriptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_id(&payload.user_id)?;
    let post_id = parse_id(&payload.post_id)?;

    let count = store.drain_new_comments(user_id, post_id).await?;

    Ok(Json(serde_json::json!({ "count": count })))
}
