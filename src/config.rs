// src/config.rs

use dotenvy::dotenv;
use std::env;

/// Which storage backend serves the single authoritative dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageKind,
    /// Required only for the Postgres backend.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let storage = match env::var("STORAGE").as_deref() {
            Ok("memory") => StorageKind::Memory,
            _ => StorageKind::Postgres,
        };

        let database_url = match storage {
            StorageKind::Postgres => Some(
                env::var("DATABASE_URL").expect("DATABASE_URL must be set for the postgres backend"),
            ),
            StorageKind::Memory => env::var("DATABASE_URL").ok(),
        };

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            storage,
            database_url,
            port,
            rust_log,
        }
    }
}
