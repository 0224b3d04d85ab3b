//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use tokio::net::TcpListener;

use switchyard::config::AppConfig;
use switchyard::dispatch::DispatcherHandle;
use switchyard::pipeline::{BoxHandler, Middleware, RequestContext};
use switchyard::routing::Params;
use switchyard::{HttpServer, Shutdown};

/// Build a request with an empty body.
pub fn request(method: Method, path: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_string(res: Response) -> String {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Execution-order log shared by test doubles.
#[derive(Clone, Default)]
pub struct OrderLog(Arc<Mutex<Vec<String>>>);

impl OrderLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Middleware that records `tag` before calling the rest of the pipeline.
    pub fn middleware(&self, tag: &'static str) -> Tag {
        Tag {
            log: self.clone(),
            tag,
        }
    }
}

pub struct Tag {
    log: OrderLog,
    tag: &'static str,
}

impl Middleware for Tag {
    fn wrap(&self, next: BoxHandler) -> BoxHandler {
        let log = self.log.clone();
        let tag = self.tag;
        Arc::new(move |ctx: RequestContext, params: Params| {
            log.push(tag);
            next.call(ctx, params)
        })
    }
}

/// Serve `handle` on an ephemeral port until `shutdown` fires.
pub async fn start_server(config: &AppConfig, handle: DispatcherHandle, shutdown: &Shutdown) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config, handle);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
