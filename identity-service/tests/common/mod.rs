use std::sync::Arc;

use auth::HashingParams;
use auth::PasswordHasher;
use auth::TokenIssuer;
use auth::TokenIssuerConfig;
use axum::body::Body;
use axum::http::header;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use http_body_util::BodyExt;
use identity_service::config::Environment;
use identity_service::domain::user::service::AuthService;
use identity_service::inbound::http::responder::ErrorResponder;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryCredentialStore;
use serde_json::json;
use serde_json::Value;
use tower::ServiceExt;

pub const STRONG_PASSWORD: &str = "Aa1!aaaa";

/// Test application driving the full router in-process
#[derive(Clone)]
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryCredentialStore>,
    pub token_issuer: Arc<TokenIssuer>,
}

/// Collected response
pub struct TestResponse {
    pub status: StatusCode,
    pub raw: Vec<u8>,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_environment(Environment::Test)
    }

    pub fn with_environment(environment: Environment) -> Self {
        let store = Arc::new(InMemoryCredentialStore::new());

        // Cheap parameters keep the suite fast; production cost is covered in the auth crate.
        let password_hasher = Arc::new(
            PasswordHasher::new(
                HashingParams::development()
                    .with_memory_cost_kib(8 * 1024)
                    .with_time_cost(1),
            )
            .expect("Failed to create password hasher"),
        );

        let token_issuer = Arc::new(
            TokenIssuer::new(&TokenIssuerConfig {
                access_secret: "test-access-secret-key-at-least-32-bytes".to_string(),
                refresh_secret: "test-refresh-secret-key-at-least-32-bytes".to_string(),
                access_expires_in: "15m".to_string(),
                refresh_expires_in: "7d".to_string(),
            })
            .expect("Failed to create token issuer"),
        );

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&store),
            password_hasher,
            Arc::clone(&token_issuer),
        ));

        let router = create_router(
            auth_service,
            Arc::clone(&token_issuer),
            ErrorResponder::new(environment),
        );

        Self {
            router,
            store,
            token_issuer,
        }
    }

    /// Send a request through the router
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed to respond");

        let status = response.status();
        let raw = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes()
            .to_vec();
        let body = serde_json::from_slice(&raw).unwrap_or(Value::Null);

        TestResponse { status, raw, body }
    }

    /// Helper to make GET request
    pub async fn get(&self, path: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method(Method::GET)
                .uri(path)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Helper to make POST request with a JSON body
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.post_raw(path, body.to_string()).await
    }

    /// Helper to make POST request with an arbitrary body labelled as JSON
    pub async fn post_raw(&self, path: &str, body: impl Into<String>) -> TestResponse {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.into()))
                .unwrap(),
        )
        .await
    }

    /// Helper to make POST request with Bearer token
    pub async fn post_authenticated(&self, path: &str, token: &str, body: Value) -> TestResponse {
        self.send_authenticated(Method::POST, path, token, Some(body)).await
    }

    /// Helper to make a request of any method with Bearer token
    pub async fn send_authenticated(
        &self,
        method: Method,
        path: &str,
        token: &str,
        body: Option<Value>,
    ) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header(header::AUTHORIZATION, format!("Bearer {}", token));

        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        };

        self.send(request.unwrap()).await
    }

    /// Register a user with valid defaults
    pub async fn register(&self, email: &str) -> TestResponse {
        self.post(
            "/api/v1/auth/register",
            json!({
                "firstName": "Jane",
                "lastName": "Doe",
                "email": email,
                "password": STRONG_PASSWORD
            }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.post(
            "/api/v1/auth/login",
            json!({ "email": email, "password": password }),
        )
        .await
    }
}
