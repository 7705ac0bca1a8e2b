// src/storage/postgres/users.rs

use sqlx::{PgPool, Row};

use crate::error::AppError;
use crate::storage::NewUser;

/// Insert a new user. The `lower(...)` unique indexes enforce the global
/// case-insensitive uniqueness of login, phone and email; a violation comes
/// back as `Conflict` through the sqlx error mapping.
pub(super) async fn create_user(pool: &PgPool, input: NewUser) -> Result<i64, AppError> {
    let row = sqlx::query(
        "INSERT INTO users (login, name, surname, phone, email)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(&input.login)
    .bind(&input.name)
    .bind(&input.surname)
    .bind(&input.phone)
    .bind(&input.email)
    .fetch_one(pool)
    .await?;

    Ok(row.try_get("id")?)
}
