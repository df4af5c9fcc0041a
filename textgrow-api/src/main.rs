//! # TextGrow API Server
//!
//! HTTP API for the TextGrow text-expansion manager: users define shortcut
//! triggers that expand into snippets, organized into folders and tags.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/textgrow \
//! IDENTITY_URL=https://identity.example.com/auth/v1 \
//! cargo run -p textgrow-api
//! ```

use std::sync::Arc;
use textgrow_api::app::{build_router, AppState};
use textgrow_api::config::Config;
use textgrow_shared::auth::provider::HttpIdentityProvider;
use textgrow_shared::db::{migrations, pool};
use textgrow_shared::store::postgres::PgStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "textgrow_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TextGrow API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    if config.auth.demo_fallback {
        tracing::warn!(
            "AUTH_DEMO_FALLBACK is enabled: failed authentication will fall \
             back to the demo principal. Do not run this mode in production."
        );
    }

    let pg_pool = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&pg_pool).await?;

    let state = AppState::new(
        Arc::new(PgStore::new(pg_pool)),
        Arc::new(HttpIdentityProvider::new(config.identity.base_url.clone())),
        config.clone(),
    );

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Server listening on http://{}", config.bind_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutdown signal received, exiting...");
        })
        .await?;

    Ok(())
}
