//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router that hosts the dispatcher
//! - Wire up tower-http middleware (tracing, timeout)
//! - Bind server to listener and shut down gracefully
//!
//! Every request goes through a single fallback handler that loads the
//! currently published dispatcher snapshot, so swapping the handle takes
//! effect on the next request without restarting the listener.

use std::time::Duration;

use axum::{body::Body, extract::State, http::Request, response::Response, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::dispatch::DispatcherHandle;

/// Application state injected into the fallback handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: DispatcherHandle,
}

/// HTTP host for a [`DispatcherHandle`].
pub struct HttpServer {
    router: Router,
    handle: DispatcherHandle,
}

impl HttpServer {
    pub fn new(config: &AppConfig, handle: DispatcherHandle) -> Self {
        let state = AppState {
            dispatcher: handle.clone(),
        };
        let router = Self::build_router(config, state);
        Self { router, handle }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.server.request_timeout_secs,
                    ))),
            )
    }

    /// The axum router, for embedding in a larger application.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Handle for publishing new dispatcher snapshots while serving.
    pub fn handle(&self) -> &DispatcherHandle {
        &self.handle
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.handle.load().table().len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    state.dispatcher.handle(request).await
}
