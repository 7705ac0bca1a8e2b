// tests/api_tests.rs
//
// End-to-end tests over the HTTP boundary, backed by the in-memory store so
// no database is needed. These exercise the decimal-string id wire format
// and the HTTP status mapping of the domain errors.

use std::sync::Arc;

use postgraph::config::{Config, StorageKind};
use postgraph::state::AppState;
use postgraph::storage::MemoryStore;
use postgraph::routes;

/// Spawn the app on a random port and return its base URL.
async fn spawn_app() -> String {
    let config = Config {
        storage: StorageKind::Memory,
        database_url: None,
        port: 0,
        rust_log: "error".to_string(),
    };
    let state = AppState {
        store: Arc::new(MemoryStore::new()),
        config,
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn create_user(client: &reqwest::Client, address: &str) -> String {
    let tag = &uuid::Uuid::new_v4().to_string()[..8];
    let response = client
        .post(format!("{}/api/users", address))
        .json(&serde_json::json!({
            "login": format!("u_{}", tag),
            "name": "Test",
            "surname": "User",
            "phone": format!("+7-{}", tag),
            "email": format!("{}@example.com", tag),
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);
    response.json::<serde_json::Value>().await.unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn create_post(client: &reqwest::Client, address: &str, author_id: &str) -> String {
    let response = client
        .post(format!("{}/api/posts", address))
        .json(&serde_json::json!({
            "author_id": author_id,
            "title": "A post",
            "body": "Post body",
            "is_commented": true,
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);
    response.json::<serde_json::Value>().await.unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn create_comment(
    client: &reqwest::Client,
    address: &str,
    post_id: &str,
    author_id: &str,
    parent_id: Option<&str>,
) -> String {
    let mut body = serde_json::json!({
        "post_id": post_id,
        "author_id": author_id,
        "body": "A comment",
    });
    if let Some(parent) = parent_id {
        body["parent_id"] = serde_json::json!(parent);
    }
    let response = client
        .post(format!("{}/api/comments", address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);
    response.json::<serde_json::Value>().await.unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn register_works_and_ids_are_decimal_strings() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let id = create_user(&client, &address).await;
    assert!(id.parse::<i64>().is_ok());
}

#[tokio::test]
async fn duplicate_login_is_conflict() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let payload = serde_json::json!({
        "login": "same_login",
        "name": "Test",
        "surname": "User",
        "phone": "+70000000001",
        "email": "first@example.com",
    });
    let response = client
        .post(format!("{}/api/users", address))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    // Same login, different case and different phone/email.
    let response = client
        .post(format!("{}/api/users", address))
        .json(&serde_json::json!({
            "login": "SAME_LOGIN",
            "name": "Test",
            "surname": "User",
            "phone": "+70000000002",
            "email": "second@example.com",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn malformed_identifier_is_bad_request() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/users/abc/posts", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = client
        .post(format!("{}/api/comments", address))
        .json(&serde_json::json!({
            "post_id": "not-a-number",
            "author_id": "1",
            "body": "hello",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn thread_flow_over_http() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let user = create_user(&client, &address).await;
    let post = create_post(&client, &address, &user).await;
    let c1 = create_comment(&client, &address, &post, &user, None).await;
    let c2 = create_comment(&client, &address, &post, &user, Some(&c1)).await;

    let page: serde_json::Value = client
        .get(format!("{}/api/posts/{}/comments", address, post))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let rows = page.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"].as_str().unwrap(), c1);
    assert_eq!(rows[0]["parent_id"].as_str().unwrap(), "0");
    assert_eq!(rows[0]["child_count"].as_i64().unwrap(), 1);
    assert_eq!(rows[1]["id"].as_str().unwrap(), c2);
    assert_eq!(rows[1]["parent_id"].as_str().unwrap(), c1);

    // The reply is a root-level row when paging under its parent.
    let replies: serde_json::Value = client
        .get(format!(
            "{}/api/posts/{}/comments?parent_id={}",
            address, post, c1
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let rows = replies.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"].as_str().unwrap(), c2);
}

#[tokio::test]
async fn huge_page_number_is_an_empty_page() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let user = create_user(&client, &address).await;
    let post = create_post(&client, &address, &user).await;
    create_comment(&client, &address, &post, &user, None).await;

    let response = client
        .get(format!(
            "{}/api/posts/{}/comments?page=922337203685477580&per_page=1000",
            address, post
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let page: serde_json::Value = response.json().await.unwrap();
    assert!(page.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn like_toggle_over_http() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let user = create_user(&client, &address).await;
    let post = create_post(&client, &address, &user).await;

    for _ in 0..2 {
        let response = client
            .post(format!("{}/api/posts/{}/likes", address, post))
            .json(&serde_json::json!({ "user_id": user, "is_like": true }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 204);
    }

    let counts: serde_json::Value = client
        .get(format!("{}/api/posts/{}/likes", address, post))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(counts["likes"].as_i64().unwrap(), 0);
    assert_eq!(counts["dislikes"].as_i64().unwrap(), 0);
}

#[tokio::test]
async fn subscription_drain_over_http() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let author = create_user(&client, &address).await;
    let reader = create_user(&client, &address).await;
    let post = create_post(&client, &address, &author).await;

    let response = client
        .post(format!("{}/api/subscriptions", address))
        .json(&serde_json::json!({ "user_id": reader, "post_id": post }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    create_comment(&client, &address, &post, &author, None).await;

    async fn drain(client: &reqwest::Client, address: &str, reader: &str, post: &str) -> i64 {
        client
            .post(format!("{}/api/subscriptions/drain", address))
            .json(&serde_json::json!({ "user_id": reader, "post_id": post }))
            .send()
            .await
            .unwrap()
            .json::<serde_json::Value>()
            .await
            .unwrap()["count"]
            .as_i64()
            .unwrap()
    }

    assert_eq!(drain(&client, &address, &reader, &post).await, 1);
    assert_eq!(drain(&client, &address, &reader, &post).await, 0);

    // Unsubscribe, then the existence gate fails.
    let response = client
        .delete(format!(
            "{}/api/subscriptions?user_id={}&post_id={}",
            address, reader, post
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let response = client
        .get(format!(
            "{}/api/subscriptions?user_id={}&post_id={}",
            address, reader, post
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn comments_for_unknown_post_is_not_found() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/posts/999/comments", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}
