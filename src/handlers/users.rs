// src/handlers/users.rs

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    models::user::CreateUserRequest,
    storage::{NewUser, Store},
};

/// Register a new user. Login, phone and email must be globally unique
/// (case-insensitive); a collision comes back as 409.
pub async fn create_user(
    State(store): State<Arc<dyn Store>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let id = store
        .create_user(NewUser {
            login: payload.login,
            name: payload.name,
            surname: payload.surname,
            phone: payload.phone,
            email: payload.email,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": id.to_string() })),
    ))
}
