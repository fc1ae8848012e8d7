#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use sisfun_api::auth::jwt::JwtConfig;
use sisfun_api::auth::password::hash_password;
use sisfun_api::config::ServerConfig;
use sisfun_api::router::build_app_router;
use sisfun_api::state::AppState;
use sisfun_api::storage::UploadStore;
use sisfun_api::ws::WsManager;
use sisfun_core::types::DbId;
use sisfun_db::models::dispatch::CreateDispatchAssignment;
use sisfun_db::models::driver::{CreateDriver, Driver};
use sisfun_db::models::service_order::{CreateServiceOrder, ServiceOrder};
use sisfun_db::models::user::{CreateUser, User};
use sisfun_db::repositories::{DispatchRepo, DriverRepo, ServiceOrderRepo, UserRepo, VehicleRepo};
use sisfun_events::EventBus;

pub const ROLE_ID_ADMIN: DbId = 1;
pub const ROLE_ID_OPERATOR: DbId = 2;
pub const ROLE_ID_DRIVER: DbId = 3;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Smallest byte sequence `image::guess_format` recognises as PNG.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";

pub fn test_jwt() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-do-not-use".to_string(),
        access_token_expiry_mins: 15,
        refresh_token_expiry_days: 7,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(upload_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir,
        max_upload_bytes: 5 * 1024 * 1024,
        jwt: test_jwt(),
    }
}

/// A router over a fresh upload directory, plus handles on its shared state.
///
/// The upload directory is deleted when this value is dropped.
pub struct TestApp {
    pub router: Router,
    pub upload_dir: TempDir,
    pub event_bus: Arc<EventBus>,
    pub ws_manager: Arc<WsManager>,
}

impl TestApp {
    /// A clone of the router for one `oneshot` call.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Number of files currently stored under `checklist/`.
    pub fn stored_photo_count(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path().join("checklist"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Build the full application router with the production middleware stack.
pub async fn build_test_app(pool: PgPool) -> TestApp {
    let upload_dir = TempDir::new().expect("tempdir");
    let config = test_config(upload_dir.path().to_path_buf());

    let uploads = Arc::new(UploadStore::new(upload_dir.path()));
    uploads
        .ensure_dirs(&["checklist"])
        .await
        .expect("upload dirs");

    let ws_manager = Arc::new(WsManager::new());
    let event_bus = Arc::new(EventBus::default());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager: Arc::clone(&ws_manager),
        uploads,
        event_bus: Arc::clone(&event_bus),
    };

    TestApp {
        router: build_app_router(state, &config),
        upload_dir,
        event_bus,
        ws_manager,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// One part of a multipart form.
pub enum Part<'a> {
    File { name: &'a str, data: &'a [u8] },
    Text { name: &'a str, value: &'a str },
}

const BOUNDARY: &str = "sisfun-test-boundary";

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File { name, data } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{name}.png\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    parts: &[Part<'_>],
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}

/// The four mandatory photo parts, all valid PNGs.
pub fn four_photos() -> Vec<Part<'static>> {
    ["photo1", "photo2", "photo3", "photo4"]
        .into_iter()
        .map(|name| Part::File {
            name,
            data: PNG_BYTES,
        })
        .collect()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a user with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, username: &str, role_id: DbId) -> User {
    let hashed = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: hashed,
            role_id,
        },
    )
    .await
    .expect("user creation should succeed")
}

pub fn token_for(user_id: DbId, role: &str) -> String {
    test_jwt().issue_access_token(user_id, role).expect("token")
}

/// An operator login and its bearer token.
pub async fn operator(pool: &PgPool) -> (User, String) {
    let user = create_user(pool, "operador1", ROLE_ID_OPERATOR).await;
    let token = token_for(user.id, "operador");
    (user, token)
}

/// A `motorista` login linked to a driver row, and its bearer token.
pub async fn driver_login(pool: &PgPool, username: &str) -> (Driver, String) {
    let user = create_user(pool, username, ROLE_ID_DRIVER).await;
    let driver = DriverRepo::create(
        pool,
        &CreateDriver {
            user_id: Some(user.id),
            name: format!("Motorista {username}"),
            phone: None,
            license_number: None,
        },
    )
    .await
    .expect("driver creation should succeed");
    (driver, token_for(user.id, "motorista"))
}

pub async fn create_order(pool: &PgPool, number: &str) -> ServiceOrder {
    ServiceOrderRepo::create(
        pool,
        &CreateServiceOrder {
            order_number: number.to_string(),
            deceased_name: "Maria da Silva".to_string(),
            requester_name: None,
            requester_phone: None,
            origin_address: Some("Hospital Municipal".to_string()),
            destination_address: Some("Cemitério São João".to_string()),
            scheduled_at: None,
            notes: None,
        },
        None,
    )
    .await
    .expect("order creation should succeed")
}

/// A pending assignment of `driver_id` to a new order with a new vehicle.
/// Returns `(order_id, assignment_id)`.
pub async fn create_assignment(pool: &PgPool, number: &str, driver_id: DbId) -> (DbId, DbId) {
    let order = create_order(pool, number).await;
    let vehicle = VehicleRepo::create(pool, &format!("TST{:04}", order.id % 10_000), None)
        .await
        .expect("vehicle creation should succeed");
    let assignment = DispatchRepo::create(
        pool,
        &CreateDispatchAssignment {
            service_order_id: order.id,
            driver_id,
            vehicle_id: Some(vehicle.id),
            notes: None,
        },
    )
    .await
    .expect("assignment creation should succeed");
    (order.id, assignment.id)
}
