//! Panic recovery.
//!
//! Without this middleware a panicking handler propagates to the hosting
//! server. With it, the panic is logged and turned into a 500.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures_util::FutureExt;

use crate::pipeline::{BoxHandler, Middleware, RequestContext};
use crate::routing::Params;

pub struct Recovery;

impl Middleware for Recovery {
    fn wrap(&self, next: BoxHandler) -> BoxHandler {
        Arc::new(move |ctx: RequestContext, params: Params| {
            let method = ctx.method().clone();
            let path = ctx.path().to_string();
            // Handlers may panic while building their future as well as while polling it.
            let started = std::panic::catch_unwind(AssertUnwindSafe(|| next.call(ctx, params)));

            async move {
                let outcome = match started {
                    Ok(fut) => AssertUnwindSafe(fut).catch_unwind().await,
                    Err(panic) => Err(panic),
                };
                outcome.unwrap_or_else(|panic| {
                    tracing::error!(
                        method = %method,
                        path = %path,
                        panic = panic_message(&*panic),
                        "Handler panicked"
                    );
                    internal_error()
                })
            }
        })
    }
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{boxed, Handler};
    use axum::body::Body;
    use axum::http::Request;
    use futures_util::future::BoxFuture;

    fn ctx() -> RequestContext {
        RequestContext::new(Request::new(Body::empty()))
    }

    #[tokio::test]
    async fn test_async_panic_becomes_500() {
        let handler = Recovery.wrap(boxed(|_: RequestContext, params: Params| async move {
            if params.is_empty() {
                panic!("boom");
            }
            "unreachable"
        }));
        let res = handler.call(ctx(), Params::new()).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    struct PanicsEagerly;

    impl Handler for PanicsEagerly {
        fn call(&self, _: RequestContext, _: Params) -> BoxFuture<'static, Response> {
            panic!("before any future exists")
        }
    }

    #[tokio::test]
    async fn test_sync_panic_becomes_500() {
        let res = Recovery.wrap(boxed(PanicsEagerly)).call(ctx(), Params::new()).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_healthy_handler_untouched() {
        let handler = Recovery.wrap(boxed(|_: RequestContext, _: Params| async { "fine" }));
        assert_eq!(handler.call(ctx(), Params::new()).await.status(), StatusCode::OK);
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u8), "non-string panic payload");
    }
}
