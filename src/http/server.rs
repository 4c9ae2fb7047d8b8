//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with a catch-all mock handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Dispatch every request to the behavior registry
//! - Apply configured delays without holding any registry lock
//! - Drain in-flight requests for a bounded grace period on shutdown

use std::borrow::Cow;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response::render;
use crate::observability::metrics;
use crate::routing::Registry;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
}

/// HTTP server answering from the active behavior set.
pub struct MockServer {
    router: Router,
    shutdown_grace: Duration,
}

impl MockServer {
    pub fn new(config: &ServerConfig, registry: Arc<Registry>) -> Self {
        let state = AppState { registry };
        let router = Self::build_router(config.timeouts.request_secs, state);
        Self {
            router,
            shutdown_grace: Duration::from_secs(config.timeouts.shutdown_grace_secs),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(request_secs: u64, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/{*path}", any(mock_handler))
            .route("/", any(mock_handler))
            .with_state(state);

        if request_secs > 0 {
            router = router.layer(TimeoutLayer::new(Duration::from_secs(request_secs)));
        }

        router
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until `shutdown` fires, then drain for at most the grace period.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Mock server listening");

        // Fires once the graceful shutdown has begun.
        let (draining_tx, draining_rx) = oneshot::channel::<()>();
        let server = axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                let _ = draining_tx.send(());
            })
            .into_future();
        let mut server = std::pin::pin!(server);

        tokio::select! {
            result = &mut server => {
                result?;
                tracing::info!("Mock server stopped");
                return Ok(());
            }
            _ = draining_rx => {
                tracing::info!(grace_secs = self.shutdown_grace.as_secs(), "Draining in-flight requests");
            }
        }

        match tokio::time::timeout(self.shutdown_grace, &mut server).await {
            Ok(result) => {
                result?;
                tracing::info!("Mock server stopped");
            }
            Err(_) => {
                tracing::warn!("Grace period elapsed, dropping remaining connections");
            }
        }
        Ok(())
    }
}

/// Catch-all handler: match, wait out the delay, render.
async fn mock_handler(State(state): State<AppState>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    let start = Instant::now();
    // Behavior URLs are written decoded; a path that is not UTF-8 once
    // decoded is compared as sent.
    let path = urlencoding::decode(uri.path()).unwrap_or(Cow::Borrowed(uri.path()));

    let dispatch = state.registry.match_request(&method, &path);

    tracing::debug!(
        request_id = %request_id(&headers),
        method = %method,
        path = %path,
        matched = dispatch.matched,
        status = dispatch.status.as_u16(),
        "Dispatched request"
    );

    if let Some(delay) = dispatch.response.delay {
        tokio::time::sleep(delay).await;
    }

    let response = render(&dispatch);
    metrics::record_request(method.as_str(), dispatch.status.as_u16(), dispatch.matched, start);
    response
}
