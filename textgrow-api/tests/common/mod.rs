/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - An app instance over the in-memory store and a static identity provider
/// - Pre-registered test users with bearer tokens
/// - Request helpers returning (status, parsed JSON body)

use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use textgrow_api::app::{build_router, AppState};
use textgrow_api::config::{ApiConfig, AuthConfig, Config, DatabaseConfig, IdentityConfig};
use textgrow_shared::models::user::{CreateUser, User};
use textgrow_shared::store::memory::MemoryStore;
use textgrow_shared::store::Store;
use textgrow_shared::auth::provider::StaticIdentityProvider;
use tower::Service as _;

/// Bearer token resolving to the primary test user
pub const TOKEN_JANE: &str = "test-token-jane";

/// Bearer token resolving to the secondary test user
pub const TOKEN_JOHN: &str = "test-token-john";

/// Test context containing the app and its injected collaborators
pub struct TestContext {
    pub app: axum::Router,
    pub store: Arc<MemoryStore>,
    pub jane: User,
    pub john: User,
}

impl TestContext {
    /// Creates a context in the strict (production) auth mode
    pub async fn new() -> Self {
        Self::with_demo_fallback(false).await
    }

    /// Creates a context with the given demo-fallback setting
    pub async fn with_demo_fallback(demo_fallback: bool) -> Self {
        let store = Arc::new(MemoryStore::new());

        let jane = store
            .create_user(CreateUser {
                email: "jane@example.com".to_string(),
                name: Some("Jane".to_string()),
                avatar_url: None,
            })
            .await
            .unwrap();

        let john = store
            .create_user(CreateUser {
                email: "john@example.com".to_string(),
                name: Some("John".to_string()),
                avatar_url: None,
            })
            .await
            .unwrap();

        let identity = StaticIdentityProvider::new()
            .with_token(TOKEN_JANE, jane.id)
            .with_token(TOKEN_JOHN, john.id);

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 1,
            },
            identity: IdentityConfig {
                base_url: "http://identity.invalid".to_string(),
            },
            auth: AuthConfig { demo_fallback },
        };

        let state = AppState::new(store.clone(), Arc::new(identity), config);
        let app = build_router(state);

        TestContext {
            app,
            store,
            jane,
            john,
        }
    }

    /// Sends a request, returning the status and parsed JSON body
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        self.request("GET", uri, token, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        self.request("POST", uri, token, Some(body)).await
    }

    pub async fn put(
        &self,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        self.request("PUT", uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        self.request("DELETE", uri, token, None).await
    }
}

/// Creates a shortcut over HTTP as the given principal, returning its body
pub async fn create_shortcut(
    ctx: &TestContext,
    token: &str,
    trigger: &str,
    content: &str,
) -> serde_json::Value {
    let (status, body) = ctx
        .post(
            "/api/shortcuts",
            Some(token),
            serde_json::json!({ "trigger": trigger, "content": content }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "create failed: {}", body);
    body
}
