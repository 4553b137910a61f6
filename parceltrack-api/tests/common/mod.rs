/// Common test utilities for API integration tests
///
/// Builds the full router on top of the in-memory stores and the mock
/// tracking provider, so the HTTP surface can be exercised without a
/// database or a live carrier.

use axum::body::Body;
use axum::http::Request;
use parceltrack_api::app::{build_router, AppState};
use parceltrack_api::config::{ApiConfig, CarrierConfig, Config, DatabaseConfig, JwtConfig};
use parceltrack_shared::auth::jwt;
use parceltrack_shared::models::user::{NewAccount, User};
use parceltrack_shared::service::AccountService;
use parceltrack_shared::store::memory::{InMemoryTrackerStore, InMemoryUserStore};
use parceltrack_shared::tracking::mock::MockTrackingProvider;
use std::sync::Arc;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Password satisfying the registration strength rules
pub const STRONG_PASSWORD: &str = "SecureP@ss123";

/// Test context containing the router and handles to the fakes
pub struct TestContext {
    pub app: axum::Router,
    pub service: Arc<AccountService>,
    pub provider: Arc<MockTrackingProvider>,
}

impl TestContext {
    /// Creates a context backed by fresh in-memory state.
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserStore::new());
        let trackers = Arc::new(InMemoryTrackerStore::new());
        let provider = Arc::new(MockTrackingProvider::new());

        let service = Arc::new(AccountService::new(
            users,
            trackers,
            provider.clone(),
            JWT_SECRET,
        ));

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url: "postgresql://unused/in-memory".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: JWT_SECRET.to_string(),
            },
            carrier: CarrierConfig {
                base_url: "https://carrier.example/api".to_string(),
                timeout_seconds: 5,
            },
        };

        let state = AppState::new(service.clone(), config);
        let app = build_router(state);

        TestContext {
            app,
            service,
            provider,
        }
    }

    /// Registers a user directly through the service.
    pub async fn register_user(&self, email: &str) -> User {
        self.service
            .register(NewAccount {
                name: "Test User".to_string(),
                email: email.to_string(),
                password: STRONG_PASSWORD.to_string(),
                active: true,
            })
            .await
            .expect("test user should register")
    }

    /// Returns an Authorization header value for `user_id`.
    pub fn auth_header(&self, user_id: Uuid) -> String {
        let token = jwt::issue_token(user_id, JWT_SECRET).expect("token should sign");
        format!("Bearer {}", token)
    }
}

/// Builds a JSON request.
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Builds a bodyless request with an optional Authorization header.
pub fn get_request(uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::empty()).unwrap()
}

/// Reads a response body as JSON.
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
