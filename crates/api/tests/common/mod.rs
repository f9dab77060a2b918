//! Shared helpers for API integration tests: router construction matching
//! production, request builders, and seed-data helpers.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use promptly_api::config::ServerConfig;
use promptly_api::router::build_app_router;
use promptly_api::services::ImageStore;
use promptly_api::state::AppState;
use promptly_db::models::prompt::CreatePrompt;
use promptly_db::models::user::CreateUser;
use promptly_db::repositories::{PromptRepo, UserRepo};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        uploads_dir: test_uploads_dir(),
    }
}

/// A per-process unique uploads directory so parallel tests don't share
/// image files.
pub fn test_uploads_dir() -> String {
    std::env::temp_dir()
        .join(format!("promptly-test-uploads-{}", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .into_owned()
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        images: Arc::new(ImageStore::new(&config.uploads_dir)),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// GET a path anonymously.
pub async fn get(app: Router, path: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(path)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// GET a path as an authenticated user.
pub async fn get_as(app: Router, path: &str, user_id: i64) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(path)
            .header("x-user-id", user_id.to_string())
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// POST a JSON body, optionally authenticated.
pub async fn post_json(
    app: Router,
    path: &str,
    user_id: Option<i64>,
    body: serde_json::Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");
    if let Some(user_id) = user_id {
        builder = builder.header("x-user-id", user_id.to_string());
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Insert a user and return their id.
pub async fn seed_user(pool: &PgPool, name: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            name: name.to_string(),
            email: format!("{name}@example.com"),
            image: None,
            bio: None,
        },
    )
    .await
    .unwrap()
    .id
}

/// Insert a prompt with defaults and return its id.
pub async fn seed_prompt(pool: &PgPool, user_id: i64, title: &str) -> i64 {
    let mut tx = pool.begin().await.unwrap();
    let prompt = PromptRepo::create(
        &mut tx,
        &CreatePrompt {
            title: title.to_string(),
            description: "A seeded prompt".to_string(),
            prompt_text: "Do the thing".to_string(),
            example_outputs: None,
            suggested_model: "gpt-4".to_string(),
            user_id,
            category_id: None,
            tags: None,
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();
    prompt.id
}
