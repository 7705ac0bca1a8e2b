// src/models/mod.rs

pub mod comment;
pub mod like;
pub mod post;
pub mod subscription;
pub mod user;
