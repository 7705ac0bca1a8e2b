// src/models/user.rs

use serde::Deserialize;
use validator::Validate;

/// DTO for creating a new user.
///
/// Login, phone and email are globally unique, case-insensitively, for the
/// lifetime of the record. Field-format validation happens here, before the
/// request reaches the store.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Login length must be between 3 and 50 characters"
    ))]
    pub login: String,

    #[validate(length(min = 1, max = 50))]
    pub name: String,

    #[validate(length(min = 1, max = 50))]
    pub surname: String,

    #[validate(length(
        min = 5,
        max = 20,
        message = "Phone length must be between 5 and 20 characters"
    ))]
    pub phone: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}
