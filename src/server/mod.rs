use crate::config::{Config, ServerConfig};
use crate::store::{ArtworkRecord, RecordStore};
use anyhow::{Context, Result};
use artvault_common::Error;
use axum::{
    extract::DefaultBodyLimit, http::StatusCode, middleware, response::IntoResponse,
    routing::get, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub mod cors;
pub mod error;
pub mod routes_api;

use cors::{cors_middleware, CorsPolicy};
use error::AppError;

/// URL prefix under which per-record images are served
pub const ARTWORK_IMAGES_ROUTE: &str = "/images/artworks";

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub store: RecordStore,
    /// AI service key for downstream handlers; never logged or returned
    ai_api_key: Option<Arc<str>>,
}

impl AppContext {
    /// Build the context, reading the AI key from the configured variable
    pub fn new(config: Config) -> Self {
        let ai_api_key: Option<Arc<str>> = config.server.ai_api_key().map(Arc::from);
        Self::with_ai_api_key(config, ai_api_key)
    }

    pub fn with_ai_api_key(config: Config, ai_api_key: Option<Arc<str>>) -> Self {
        let store = RecordStore::new(config.storage.store_path.clone());
        Self {
            config: Arc::new(config),
            store,
            ai_api_key,
        }
    }

    pub fn ai_api_key(&self) -> Option<&str> {
        self.ai_api_key.as_deref()
    }

    /// Read the record store from disk. Every call re-reads the file.
    pub async fn load_records(&self) -> Result<Vec<ArtworkRecord>, AppError> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.records())
            .await
            .map_err(|e| Error::internal(format!("store loader panicked: {}", e)))?
            .map_err(AppError::from)
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let server = &ctx.config.server;

    let mut app = Router::new()
        .route("/health", get(health_check))
        .nest("/api", routes_api::api_routes())
        .nest_service(
            ARTWORK_IMAGES_ROUTE,
            ServeDir::new(&ctx.config.storage.images_dir),
        );

    if let Some(ref dir) = server.public_dir {
        if dir.exists() {
            tracing::info!("Serving public assets from {:?}", dir);
            app = app.fallback_service(
                ServeDir::new(dir).append_index_html_on_directories(true),
            );
        }
    }

    apply_layers(app, server).with_state(ctx)
}

/// Wrap every route in `router` with the request body limit, the CORS
/// allow-list and request tracing.
pub fn apply_layers<S>(router: Router<S>, server: &ServerConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let cors = CorsPolicy::new(&server.allowed_origins);

    router
        .layer(DefaultBodyLimit::max(server.body_limit_bytes()))
        .layer(middleware::from_fn_with_state(cors, cors_middleware))
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let ctx = AppContext::new(config);

    if ctx.ai_api_key().is_some() {
        tracing::info!("AI API key loaded from {}", ctx.config.server.api_key_env);
    } else {
        tracing::warn!(
            "{} is not set; AI-backed handlers will be unavailable",
            ctx.config.server.api_key_env
        );
    }
    tracing::info!("Record store: {:?}", ctx.store.path());
    tracing::info!("Artwork images: {:?}", ctx.config.storage.images_dir);
    tracing::info!(
        "CORS allow-list: {}",
        ctx.config.server.allowed_origins.join(", ")
    );

    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolves once the process is asked to stop, so in-flight requests can
/// drain before the listener closes.
async fn shutdown_signal() {
    let reason = tokio::select! {
        _ = interrupt() => "interrupt",
        _ = terminate() => "SIGTERM",
    };
    tracing::info!("Received {}; draining connections", reason);
}

async fn interrupt() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Ctrl+C handler unavailable: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use signal::unix::{signal as unix_signal, SignalKind};

    match unix_signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            tracing::error!("SIGTERM handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
