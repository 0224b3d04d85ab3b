//! Handler capability and request-scoped context.

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request};
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;

use crate::routing::Params;

/// Request-scoped context passed explicitly through the pipeline.
///
/// Middleware augments the context through typed extensions rather than
/// ambient state; handlers read those values back with [`get`](Self::get).
#[derive(Debug)]
pub struct RequestContext {
    request: Request<Body>,
}

impl RequestContext {
    pub fn new(request: Request<Body>) -> Self {
        Self { request }
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    /// URI path of the request as the handler sees it.
    pub fn path(&self) -> &str {
        self.request.uri().path()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    pub fn request(&self) -> &Request<Body> {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request<Body> {
        &mut self.request
    }

    pub fn into_request(self) -> Request<Body> {
        self.request
    }

    /// Attach a value for inner middleware and the handler.
    pub fn insert<T: Clone + Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
        self.request.extensions_mut().insert(value)
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.request.extensions().get::<T>()
    }

    pub fn remove<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.request.extensions_mut().remove::<T>()
    }
}

impl From<Request<Body>> for RequestContext {
    fn from(request: Request<Body>) -> Self {
        Self::new(request)
    }
}

/// Uniform request-handling capability: `(context, params) -> response`.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: RequestContext, params: Params) -> BoxFuture<'static, Response>;
}

/// Shared, type-erased handler.
pub type BoxHandler = Arc<dyn Handler>;

impl<F, Fut, R> Handler for F
where
    F: Fn(RequestContext, Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn call(&self, ctx: RequestContext, params: Params) -> BoxFuture<'static, Response> {
        let fut = (self)(ctx, params);
        Box::pin(async move { fut.await.into_response() })
    }
}

pub fn boxed<H: Handler>(handler: H) -> BoxHandler {
    Arc::new(handler)
}
