//! Access logging.

use std::sync::Arc;
use std::time::Instant;

use crate::middleware::request_id::RequestId;
use crate::pipeline::{BoxHandler, Middleware, RequestContext};
use crate::routing::Params;

/// Logs method, path, status and elapsed time once the inner pipeline
/// has produced a response. Place it inside [`RequestIdMiddleware`] to get
/// the request id on each line.
///
/// [`RequestIdMiddleware`]: crate::middleware::RequestIdMiddleware
pub struct AccessLog;

impl Middleware for AccessLog {
    fn wrap(&self, next: BoxHandler) -> BoxHandler {
        Arc::new(move |ctx: RequestContext, params: Params| {
            let next = next.clone();
            async move {
                let start = Instant::now();
                let method = ctx.method().clone();
                let path = ctx.path().to_string();
                let request_id = ctx.get::<RequestId>().cloned();

                let response = next.call(ctx, params).await;

                tracing::info!(
                    request_id = request_id.as_ref().map(RequestId::as_str).unwrap_or("-"),
                    method = %method,
                    path = %path,
                    status = response.status().as_u16(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Request handled"
                );
                response
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::boxed;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};

    #[tokio::test]
    async fn test_response_passes_through() {
        let handler = AccessLog.wrap(boxed(|_: RequestContext, _: Params| async {
            (StatusCode::CREATED, "made")
        }));
        let ctx = RequestContext::new(Request::new(Body::empty()));
        assert_eq!(handler.call(ctx, Params::new()).await.status(), StatusCode::CREATED);
    }
}
