// src/routes.rs

use axum::{
    Router,
    http::Method,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{comments, likes, posts, subscriptions, users};
use crate::state::AppState;

/// Assembles the main application router.
///
/// * Merges all sub-routers (users, posts, comments, subscriptions).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (store + config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let user_routes = Router::new()
        .route("/", post(users::create_user))
        .route("/{id}/posts", get(posts::list_posts));

    let post_routes = Router::new()
        .route("/", post(posts::create_post))
        .route("/{id}", put(posts::update_post).delete(posts::delete_post))
        .route("/{id}/comments", get(comments::list_comments))
        .route(
            "/{id}/likes",
            post(likes::toggle_post_like).get(likes::get_post_likes),
        );

    let comment_routes = Router::new()
        .route("/", post(comments::create_comment))
        .route(
            "/{id}",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .route(
            "/{id}/likes",
            post(likes::toggle_comment_like).get(likes::get_comment_likes),
        );

    let subscription_routes = Router::new()
        .route(
            "/",
            post(subscriptions::create_subscription)
                .delete(subscriptions::delete_subscription)
                .get(subscriptions::check_subscription),
        )
        .route("/drain", post(subscriptions::drain_new_comments));

    Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/posts", post_routes)
        .nest("/api/comments", comment_routes)
        .nest("/api/subscriptions", subscription_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
