/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use textgrow_api::{app::{build_router, AppState}, config::Config};
/// use textgrow_shared::auth::provider::HttpIdentityProvider;
/// use textgrow_shared::db::pool::{create_pool, DatabaseConfig};
/// use textgrow_shared::store::postgres::PgStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     max_connections: config.database.max_connections,
///     ..Default::default()
/// })
/// .await?;
///
/// let state = AppState::new(
///     Arc::new(PgStore::new(pool)),
///     Arc::new(HttpIdentityProvider::new(config.identity.base_url.clone())),
///     config,
/// );
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use textgrow_shared::auth::{provider::IdentityProvider, AuthContext, DEMO_USER_EMAIL, DEMO_USER_ID};
use textgrow_shared::store::Store;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. The store
/// and identity provider are injected once at startup; substituting the
/// in-memory store and a static provider yields a fully offline test app.
#[derive(Clone)]
pub struct AppState {
    /// The relational store
    pub store: Arc<dyn Store>,

    /// The external identity provider
    pub identity: Arc<dyn IdentityProvider>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn Store>, identity: Arc<dyn IdentityProvider>, config: Config) -> Self {
        Self {
            store,
            identity,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /api
/// ├── GET    /                  # Liveness (public)
/// ├── GET    /health            # Health incl. store probe (public)
/// ├── POST   /auth/signup       # Create account profile (public)
/// ├── GET    /auth/me           # Current profile (bearer)
/// ├── GET    /shortcuts         # List, enriched (bearer)
/// ├── POST   /shortcuts         # Create (bearer)
/// ├── PUT    /shortcuts/:id     # Update (bearer)
/// ├── DELETE /shortcuts/:id     # Delete (bearer)
/// ├── GET    /search?q=         # Search, enriched (bearer)
/// ├── GET    /folders           # List (bearer)
/// ├── POST   /folders           # Create (bearer)
/// ├── PUT    /folders/:id       # Update (bearer)
/// ├── DELETE /folders/:id       # Delete (bearer)
/// ├── GET    /tags              # List (public, global)
/// ├── POST   /tags              # Create, idempotent by name (public)
/// ├── PUT    /tags/:id          # Update (public)
/// ├── DELETE /tags/:id          # Delete (public)
/// ├── GET    /export            # Snapshot of shortcuts + folders (bearer)
/// └── POST   /import            # Restore shortcuts from snapshot (bearer)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Bearer authentication (per-route-group)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes: liveness, health, signup, and the global tag surface
    let public_routes = Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .route("/auth/signup", post(routes::auth::signup))
        .route("/tags", get(routes::tags::list_tags))
        .route("/tags", post(routes::tags::create_tag))
        .route("/tags/:id", put(routes::tags::update_tag))
        .route("/tags/:id", delete(routes::tags::delete_tag));

    // Routes scoped to the authenticated principal
    let protected_routes = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .route("/shortcuts", get(routes::shortcuts::list_shortcuts))
        .route("/shortcuts", post(routes::shortcuts::create_shortcut))
        .route("/shortcuts/:id", put(routes::shortcuts::update_shortcut))
        .route("/shortcuts/:id", delete(routes::shortcuts::delete_shortcut))
        .route("/search", get(routes::shortcuts::search_shortcuts))
        .route("/folders", get(routes::folders::list_folders))
        .route("/folders", post(routes::folders::create_folder))
        .route("/folders/:id", put(routes::folders::update_folder))
        .route("/folders/:id", delete(routes::folders::delete_folder))
        .route("/export", get(routes::snapshot::export_snapshot))
        .route("/import", post(routes::snapshot::import_snapshot))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            bearer_auth_layer,
        ));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        // Liveness at the trailing-slash path. Axum 0.7 nesting serves a
        // nested `/` route at `/api` but not `/api/`; mount it explicitly so
        // the spec'd `GET /api/` endpoint is reachable.
        .route("/api/", get(routes::health::root))
        .nest("/api", public_routes.merge(protected_routes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Bearer authentication middleware layer
///
/// Extracts the bearer token from the Authorization header, resolves it with
/// the identity provider, and injects [`AuthContext`] into request
/// extensions. Missing, malformed, and rejected credentials all surface as
/// 401 — unless the demo fallback is enabled, in which case the request
/// proceeds as the well-known demo principal, lazily provisioned in the
/// store.
async fn bearer_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let resolved = match token {
        Some(token) => state.identity.resolve(token).await.map_err(ApiError::from),
        None => Err(ApiError::Unauthorized(
            "Missing authorization header".to_string(),
        )),
    };

    let user_id = match resolved {
        Ok(user_id) => user_id,
        Err(err) => {
            if !state.config.auth.demo_fallback {
                return Err(err);
            }
            // Non-production convenience: proceed as the demo principal
            tracing::warn!("Authentication failed, falling back to demo principal");
            state.store.ensure_user(DEMO_USER_ID, DEMO_USER_EMAIL).await?;
            DEMO_USER_ID
        }
    };

    req.extensions_mut().insert(AuthContext::new(user_id));

    Ok(next.run(req).await)
}
