/// Integration tests for the Orgbase API
///
/// These tests drive the full router through tower's `Service` interface.
/// The database pool is created lazily and never connected, so every path
/// exercised here — request guard, validation, response envelopes — must
/// fail or succeed before any SQL runs. Flows that need a live schema
/// (registration happy path, organisation CRUD) run against a real database
/// operationally.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Duration;
use orgbase_api::app::{build_router, AppState};
use orgbase_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use orgbase_shared::auth::token::{issue_token, Claims};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::Service as _;
use uuid::Uuid;

const TEST_SECRET: &str = "integration-test-secret-key-32-bytes";

fn test_app() -> axum::Router {
    let config = Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgresql://localhost:5432/orgbase_test".to_string(),
            max_connections: 5,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            ttl_hours: 24,
        },
    };

    // Lazy pool: no connection is attempted until a query runs
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .unwrap();

    build_router(AppState::new(pool, config))
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_works_without_database() {
    let mut app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["database"], "disconnected");
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let mut app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/api/organisations")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["statusCode"], 400);
    assert_eq!(json["message"], "Authentication token not found");
}

#[tokio::test]
async fn test_protected_route_with_non_bearer_scheme() {
    let mut app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/api/organisations")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_route_with_garbage_token() {
    let mut app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/api/organisations")
        .header("authorization", "Bearer not-a-real-token")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = response_json(response).await;
    assert_eq!(json["statusCode"], 401);
}

#[tokio::test]
async fn test_protected_route_with_expired_token() {
    let mut app = test_app();

    let claims = Claims::new(Uuid::new_v4(), Duration::seconds(-3600));
    let token = issue_token(&claims, TEST_SECRET).unwrap();

    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/users/{}", Uuid::new_v4()))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = response_json(response).await;
    assert_eq!(json["message"], "Token has expired");
}

#[tokio::test]
async fn test_protected_route_with_wrong_secret_token() {
    let mut app = test_app();

    let claims = Claims::new(Uuid::new_v4(), Duration::hours(1));
    let token = issue_token(&claims, "a-completely-different-secret-key-00").unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/api/organisations")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_with_empty_body_lists_every_field() {
    let mut app = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = response_json(response).await;
    let errors = json["errors"].as_array().expect("errors array");
    assert_eq!(errors.len(), 5);

    let fields: Vec<&str> = errors
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    for field in ["firstName", "lastName", "email", "password", "phone"] {
        assert!(fields.contains(&field), "missing error for {}", field);
    }
}

#[tokio::test]
async fn test_register_with_malformed_email() {
    let mut app = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "firstName": "Ann",
                "lastName": "Lee",
                "email": "not-an-email",
                "password": "secret1",
                "phone": "555-1"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = response_json(response).await;
    let errors = json["errors"].as_array().expect("errors array");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["field"], "email");
    assert_eq!(errors[0]["message"], "email is invalid");
}

#[tokio::test]
async fn test_login_with_missing_fields() {
    let mut app = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "email": "ann@x.com" }).to_string()))
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = response_json(response).await;
    assert_eq!(json["statusCode"], 401);
    assert_eq!(json["message"], "Authentication failed");
}

#[tokio::test]
async fn test_login_with_empty_fields() {
    let mut app = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "email": "", "password": "" }).to_string(),
        ))
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_drop_rejects_unknown_table() {
    let mut app = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/admin/migrate/drop/sessions")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["message"], "Unknown table: sessions");
}
