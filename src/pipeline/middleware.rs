//! Middleware capability and onion composition.
//!
//! A middleware turns the next handler into a new handler. Composition nests
//! them so the first middleware in a list is outermost: it runs first on the
//! way in and last on the way out. The terminal handler is innermost.

use std::future::Future;
use std::sync::Arc;

use axum::response::{IntoResponse, Response};

use crate::pipeline::handler::{BoxHandler, RequestContext};
use crate::routing::Params;

/// Transform from "next handler" to "handler".
pub trait Middleware: Send + Sync + 'static {
    fn wrap(&self, next: BoxHandler) -> BoxHandler;
}

pub type SharedMiddleware = Arc<dyn Middleware>;

/// The remainder of the pipeline, handed to a [`from_fn`] middleware.
///
/// Not calling [`run`](Next::run) short-circuits everything inside.
#[derive(Clone)]
pub struct Next {
    inner: BoxHandler,
}

impl Next {
    pub async fn run(self, ctx: RequestContext, params: Params) -> Response {
        self.inner.call(ctx, params).await
    }
}

/// Middleware built from an async function.
pub struct FromFn<F> {
    f: Arc<F>,
}

/// Build a middleware from `async fn(ctx, params, next) -> impl IntoResponse`.
pub fn from_fn<F, Fut, R>(f: F) -> FromFn<F>
where
    F: Fn(RequestContext, Params, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    FromFn { f: Arc::new(f) }
}

impl<F, Fut, R> Middleware for FromFn<F>
where
    F: Fn(RequestContext, Params, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn wrap(&self, next: BoxHandler) -> BoxHandler {
        let f = self.f.clone();
        Arc::new(move |ctx: RequestContext, params: Params| {
            let fut = f(ctx, params, Next { inner: next.clone() });
            async move { fut.await.into_response() }
        })
    }
}

/// Nest `middleware` around `terminal`, first element outermost.
pub fn compose(middleware: &[SharedMiddleware], terminal: BoxHandler) -> BoxHandler {
    middleware
        .iter()
        .rev()
        .fold(terminal, |next, mw| mw.wrap(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::handler::boxed;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    fn tracer(log: &Log, tag: &'static str) -> SharedMiddleware {
        let log = log.clone();
        Arc::new(from_fn(move |ctx, params, next: Next| {
            let log = log.clone();
            async move {
                log.lock().unwrap().push(format!("{tag} in"));
                let res = next.run(ctx, params).await;
                log.lock().unwrap().push(format!("{tag} out"));
                res
            }
        }))
    }

    fn ctx() -> RequestContext {
        RequestContext::new(Request::new(Body::empty()))
    }

    #[tokio::test]
    async fn test_onion_order() {
        let log: Log = Arc::default();
        let inner = log.clone();
        let handler = boxed(move |_: RequestContext, _: Params| {
            let inner = inner.clone();
            async move {
                inner.lock().unwrap().push("handler".to_string());
                "done"
            }
        });

        let composed = compose(&[tracer(&log, "a"), tracer(&log, "b")], handler);
        let res = composed.call(ctx(), Params::new()).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            *log.lock().unwrap(),
            ["a in", "b in", "handler", "b out", "a out"]
        );
    }

    #[tokio::test]
    async fn test_short_circuit_skips_inner() {
        let log: Log = Arc::default();
        let deny: SharedMiddleware = Arc::new(from_fn(|_ctx, _params, _next: Next| async {
            (StatusCode::UNAUTHORIZED, "denied")
        }));
        let inner = log.clone();
        let handler = boxed(move |_: RequestContext, _: Params| {
            let inner = inner.clone();
            async move {
                inner.lock().unwrap().push("handler".to_string());
                "ok"
            }
        });

        let composed = compose(&[tracer(&log, "outer"), deny, tracer(&log, "inner")], handler);
        let res = composed.call(ctx(), Params::new()).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(*log.lock().unwrap(), ["outer in", "outer out"]);
    }

    #[derive(Clone)]
    struct User(&'static str);

    #[tokio::test]
    async fn test_context_augmentation_reaches_handler() {
        let auth: SharedMiddleware = Arc::new(from_fn(|mut ctx: RequestContext, params, next: Next| async move {
            ctx.insert(User("alice"));
            next.run(ctx, params).await
        }));
        let handler = boxed(|ctx: RequestContext, _: Params| async move {
            ctx.get::<User>().map(|u| u.0).unwrap_or("anonymous").to_string()
        });

        let res = compose(&[auth], handler).call(ctx(), Params::new()).await;
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"alice");
    }
}
