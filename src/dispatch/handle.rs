//! Atomically swappable dispatcher snapshot.
//!
//! Readers load the current `Arc<Dispatcher>` once per request and keep it
//! for the whole dispatch, so an in-flight request always sees one
//! consistent table. Reloading builds a complete new dispatcher and swaps
//! the pointer; nothing is mutated in place.

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;

use crate::dispatch::dispatcher::Dispatcher;

#[derive(Clone)]
pub struct DispatcherHandle {
    current: Arc<ArcSwap<Dispatcher>>,
}

impl DispatcherHandle {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(dispatcher)),
        }
    }

    /// The currently published snapshot.
    pub fn load(&self) -> Arc<Dispatcher> {
        self.current.load_full()
    }

    /// Publish a new snapshot, returning the one it replaced.
    pub fn replace(&self, next: Dispatcher) -> Arc<Dispatcher> {
        let routes = next.table().len();
        let previous = self.current.swap(Arc::new(next));
        tracing::info!(
            previous_routes = previous.table().len(),
            routes,
            "Route table replaced"
        );
        previous
    }

    pub async fn handle(&self, request: Request<Body>) -> Response {
        self.load().handle(request).await
    }
}

impl From<Dispatcher> for DispatcherHandle {
    fn from(dispatcher: Dispatcher) -> Self {
        Self::new(dispatcher)
    }
}
