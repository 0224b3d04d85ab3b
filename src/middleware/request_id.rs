//! Request ID propagation.
//!
//! Reuses an inbound `x-request-id` or generates a UUID v4, makes it
//! available to inner middleware and the handler as [`RequestId`], and
//! echoes it on the response.

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use uuid::Uuid;

use crate::pipeline::{BoxHandler, Middleware, RequestContext};
use crate::routing::Params;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub struct RequestIdMiddleware;

impl Middleware for RequestIdMiddleware {
    fn wrap(&self, next: BoxHandler) -> BoxHandler {
        Arc::new(move |mut ctx: RequestContext, params: Params| {
            let next = next.clone();
            async move {
                let inbound = ctx
                    .headers()
                    .get(&X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .filter(|v| !v.is_empty())
                    .map(str::to_string);

                let id = match inbound {
                    Some(id) => id,
                    None => {
                        let id = Uuid::new_v4().to_string();
                        if let Ok(value) = HeaderValue::from_str(&id) {
                            ctx.request_mut().headers_mut().insert(X_REQUEST_ID, value);
                        }
                        id
                    }
                };
                ctx.insert(RequestId(id.clone()));

                let mut response = next.call(ctx, params).await;
                if let Ok(value) = HeaderValue::from_str(&id) {
                    response.headers_mut().insert(X_REQUEST_ID, value);
                }
                response
            }
        })
    }
}
