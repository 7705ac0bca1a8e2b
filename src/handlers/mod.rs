// src/handlers/mod.rs

pub mod comments;
pub mod likes;
pub mod posts;
pub mod subscriptions;
pub mod users;
