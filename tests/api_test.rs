//! Integration tests for API endpoints.
//!
//! The router runs against the real user service over an in-memory
//! store; the database handle behind `/health` is a SeaORM mock.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use user_registration::api::{create_router, AppState};
use user_registration::domain::{NewUserRecord, Password, User, UserResponse};
use user_registration::errors::{AppError, AppResult};
use user_registration::infra::{Database, UserRepository};
use user_registration::services::UserManager;

// =============================================================================
// Test Stores
// =============================================================================

/// In-memory store that enforces email uniqueness like the real index
#[derive(Default)]
struct InMemoryUsers {
    rows: Mutex<Vec<User>>,
}

impl InMemoryUsers {
    fn stored(&self) -> Vec<User> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, record: NewUserRecord) -> AppResult<UserResponse> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == record.email) {
            return Err(AppError::DuplicateEmail);
        }

        let user = User {
            id: Uuid::new_v4(),
            name: record.name,
            email: record.email,
            password_hash: record.password_hash,
            role: record.role,
            is_active: true,
            created_at: chrono::Utc::now(),
        };
        rows.push(user.clone());
        Ok(user.into())
    }
}

/// Store whose writes always fail
struct BrokenInsertUsers;

#[async_trait]
impl UserRepository for BrokenInsertUsers {
    async fn find_by_email(&self, _email: &str) -> AppResult<Option<User>> {
        Ok(None)
    }

    async fn insert(&self, _record: NewUserRecord) -> AppResult<UserResponse> {
        Err(AppError::Database(DbErr::Custom(
            "connection reset by peer".to_string(),
        )))
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

fn mock_database(healthy: bool) -> Arc<Database> {
    let mut mock = MockDatabase::new(DatabaseBackend::Postgres);
    if healthy {
        mock = mock.append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }]);
    }
    Arc::new(Database::from_connection(mock.into_connection()))
}

fn app_with(users: Arc<dyn UserRepository>) -> Router {
    let state = AppState::new(Arc::new(UserManager::new(users)), mock_database(true));
    create_router(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn register_request(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/users/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn ana() -> Value {
    json!({
        "name": "Ana",
        "email": "ana@test.com",
        "password": "123456",
        "role": "CLIENT"
    })
}

// =============================================================================
// Registration Tests
// =============================================================================

#[tokio::test]
async fn test_register_returns_created_user_without_password() {
    let users = Arc::new(InMemoryUsers::default());
    let app = app_with(users.clone());

    let (status, body) = send(&app, register_request(&ana())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Usuário criado com sucesso");

    let user = &body["user"];
    assert_eq!(user["name"], "Ana");
    assert_eq!(user["email"], "ana@test.com");
    assert_eq!(user["role"], "CLIENT");
    assert_eq!(user["isActive"], true);
    assert!(Uuid::parse_str(user["id"].as_str().unwrap()).is_ok());
    assert!(user["createdAt"].is_string());
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());

    let stored = users.stored();
    assert_eq!(stored.len(), 1);
    assert_ne!(stored[0].password_hash, "123456");
    assert!(Password::from_hash(stored[0].password_hash.clone()).verify("123456"));
}

#[tokio::test]
async fn test_register_seller_role() {
    let app = app_with(Arc::new(InMemoryUsers::default()));
    let mut body = ana();
    body["role"] = json!("SELLER");

    let (status, body) = send(&app, register_request(&body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "SELLER");
}

#[tokio::test]
async fn test_register_same_email_twice_is_rejected() {
    let users = Arc::new(InMemoryUsers::default());
    let app = app_with(users.clone());

    let (first, _) = send(&app, register_request(&ana())).await;
    assert_eq!(first, StatusCode::CREATED);

    let mut again = ana();
    again["name"] = json!("Another Ana");
    let (status, body) = send(&app, register_request(&again)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Email já cadastrado" }));
    assert_eq!(users.stored().len(), 1);
}

#[tokio::test]
async fn test_register_validation_messages() {
    let app = app_with(Arc::new(InMemoryUsers::default()));

    let cases = [
        ("name", json!(""), "name should not be empty"),
        ("email", json!("not-an-email"), "email must be an email"),
        (
            "password",
            json!("12345"),
            "password must be longer than or equal to 6 characters",
        ),
        (
            "role",
            json!("ADMIN"),
            "role must be one of the following values: CLIENT, SELLER",
        ),
    ];

    for (field, value, expected) in cases {
        let mut body = ana();
        body[field] = value;

        let (status, body) = send(&app, register_request(&body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "field {}", field);
        assert_eq!(body, json!({ "message": [expected] }), "field {}", field);
    }
}

#[tokio::test]
async fn test_register_reports_every_violation_and_is_idempotent() {
    let users = Arc::new(InMemoryUsers::default());
    let app = app_with(users.clone());
    let bad = json!({ "name": "", "email": "x", "password": "1", "role": "ADMIN" });

    let (status, first) = send(&app, register_request(&bad)).await;
    let (_, second) = send(&app, register_request(&bad)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(first["message"].as_array().unwrap().len(), 4);
    assert_eq!(first, second);
    assert!(users.stored().is_empty());
}

#[tokio::test]
async fn test_register_missing_fields_are_violations() {
    let app = app_with(Arc::new(InMemoryUsers::default()));

    let (status, body) = send(&app, register_request(&json!({ "name": "Ana" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        json!([
            "email must be an email",
            "password must be longer than or equal to 6 characters",
            "role must be one of the following values: CLIENT, SELLER"
        ])
    );
}

#[tokio::test]
async fn test_register_null_fields_are_violations() {
    let users = Arc::new(InMemoryUsers::default());
    let app = app_with(users.clone());
    let body = json!({ "name": null, "email": "bad", "password": "1", "role": "X" });

    let (status, body) = send(&app, register_request(&body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        json!([
            "email must be an email",
            "name should not be empty",
            "password must be longer than or equal to 6 characters",
            "role must be one of the following values: CLIENT, SELLER"
        ])
    );
    assert!(users.stored().is_empty());
}

#[tokio::test]
async fn test_register_email_without_tld_is_rejected() {
    let app = app_with(Arc::new(InMemoryUsers::default()));
    let mut body = ana();
    body["email"] = json!("ana@test");

    let (status, body) = send(&app, register_request(&body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": ["email must be an email"] }));
}

#[tokio::test]
async fn test_register_ignores_unknown_fields() {
    let users = Arc::new(InMemoryUsers::default());
    let app = app_with(users.clone());
    let mut body = ana();
    body["isAdmin"] = json!(true);

    let (status, body) = send(&app, register_request(&body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["user"].get("isAdmin").is_none());
    assert!(body.get("isAdmin").is_none());
    assert_eq!(users.stored().len(), 1);
}

#[tokio::test]
async fn test_register_malformed_json_is_bad_request() {
    let app = app_with(Arc::new(InMemoryUsers::default()));
    let request = Request::builder()
        .method("POST")
        .uri("/users/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": \"Ana\","))
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_register_store_failure_hides_details() {
    let app = app_with(Arc::new(BrokenInsertUsers));

    let (status, body) = send(&app, register_request(&ana())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Internal server error" }));
}

// =============================================================================
// Operational Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_health_reports_database_status() {
    let users: Arc<dyn UserRepository> = Arc::new(InMemoryUsers::default());
    let service = Arc::new(UserManager::new(users));

    let healthy = create_router(AppState::new(service.clone(), mock_database(true)));
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&healthy, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy", "database": { "status": "healthy" } }));

    let down = create_router(AppState::new(service, mock_database(false)));
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&down, request).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"]["status"], "unhealthy");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = app_with(Arc::new(InMemoryUsers::default()));
    let request = Request::builder()
        .uri("/api-docs/openapi.json")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/users/register"]["post"].is_object());
}
