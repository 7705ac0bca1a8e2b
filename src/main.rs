// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use postgraph::config::{Config, StorageKind};
use postgraph::routes;
use postgraph::state::AppState;
use postgraph::storage::{MemoryStore, PgStore, Store};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Select the storage backend. Both serve the same contract; the dataset
    // is authoritative in whichever one is chosen.
    let store: Arc<dyn Store> = match config.storage {
        StorageKind::Memory => {
            tracing::info!("Using the in-memory storage backend");
            Arc::new(MemoryStore::new())
        }
        StorageKind::Postgres => {
            let database_url = config
                .database_url
                .clone()
                .expect("DATABASE_URL checked in Config::from_env");

            // Initialize Database Pool with Retry
            let mut retry_count = 0;
            let pool = loop {
                match PgPoolOptions::new()
                    .max_connections(5)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(&database_url)
                    .await
                {
                    Ok(pool) => break pool,
                    Err(e) => {
                        retry_count += 1;
                        if retry_count > 5 {
                            panic!("Failed to connect to database after 5 retries: {}", e);
                        }
                        tracing::warn!(
                            "Database not ready, retrying in 2s... (Attempt {})",
                            retry_count
                        );
                        tokio::time::sleep(Duration::from_secs(2)).await;
                    }
                }
            };

            tracing::info!("Database connected...");

            // Run Migrations Automatically
            tracing::info!("Running migrations...");
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Migrations applied successfully.");

            Arc::new(PgStore::new(pool))
        }
    };

    // Create AppState
    let state = AppState {
        store,
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}
