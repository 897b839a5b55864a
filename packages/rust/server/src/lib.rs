//! HTTP API for KitGuide.
//!
//! Thin axum layer over [`KitGuide`]: request validation, status mapping,
//! CORS, and request tracing. All tutoring decisions live in `kitguide-core`.

mod error;
mod handlers;

use std::sync::Arc;

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use kitguide_core::KitGuide;
use kitguide_shared::{KitGuideError, Result};

pub use error::ApiError;
pub use handlers::{ChatRequest, SessionStartRequest};

/// Service name reported by `GET /`.
pub const SERVICE_NAME: &str = "KitGuide Unified Chatbot API";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub guide: Arc<KitGuide>,
}

impl AppState {
    pub fn new(guide: KitGuide) -> Self {
        Self {
            guide: Arc::new(guide),
        }
    }
}

/// Build the router with all routes and middleware.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/favicon.ico", get(handlers::favicon))
        .route("/api/kits/:kit_id", get(handlers::read_kit))
        .route("/api/session/start", post(handlers::start_session))
        .route("/api/chat", post(handlers::chat))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// CORS layer for the configured origins. `"*"` allows any origin.
pub fn cors_layer(allow_origins: &[String]) -> Result<CorsLayer> {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allow_origins.is_empty() || allow_origins.iter().any(|o| o == "*") {
        return Ok(base.allow_origin(Any));
    }

    let origins = allow_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| {
                KitGuideError::config(format!("invalid CORS origin '{origin}': {e}"))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(base.allow_origin(AllowOrigin::list(origins)))
}

/// Options for [`serve`].
#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub host: String,
    pub port: u16,
    pub cors_allow_origins: Vec<String>,
}

/// Bind and serve until Ctrl-C.
pub async fn serve(guide: KitGuide, options: &ServeOptions) -> Result<()> {
    let cors = cors_layer(&options.cors_allow_origins)?;
    let app = build_router(AppState::new(guide), cors);

    let addr = format!("{}:{}", options.host, options.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| KitGuideError::Server(format!("failed to bind {addr}: {e}")))?;

    let local = listener
        .local_addr()
        .map_err(|e| KitGuideError::Server(e.to_string()))?;
    info!(%local, "KitGuide API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| KitGuideError::Server(e.to_string()))
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn wildcard_origin_is_accepted() {
        assert!(cors_layer(&["*".to_string()]).is_ok());
        assert!(cors_layer(&[]).is_ok());
    }

    #[test]
    fn explicit_origins_are_parsed() {
        let origins = vec![
            "http://127.0.0.1:5500".to_string(),
            "https://kits.example.com".to_string(),
        ];
        assert!(cors_layer(&origins).is_ok());
    }

    #[tokio::test]
    async fn shutdown_signal_waits_for_ctrl_c() {
        let pending = tokio::time::timeout(Duration::from_millis(50), shutdown_signal()).await;
        assert!(pending.is_err());
    }

    #[test]
    fn invalid_origin_is_config_error() {
        let err = cors_layer(&["bad\norigin".to_string()]).unwrap_err();
        assert!(err.to_string().contains("invalid CORS origin"));
    }
}
