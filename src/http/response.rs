//! Default fallback responses.
//!
//! # Responsibilities
//! - 404 when nothing matches
//! - 405 with an `Allow` header listing structurally matching methods
//! - Auto-OPTIONS answer: 200, empty body, `Allow` header
//!
//! Custom fallbacks registered on the builder replace the first two.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::pipeline::RequestContext;
use crate::routing::{AllowedMethods, Params};

pub async fn not_found(_ctx: RequestContext, _params: Params) -> Response {
    (StatusCode::NOT_FOUND, "No matching route found").into_response()
}

/// Reads the [`AllowedMethods`] extension the dispatcher attaches on a miss.
pub async fn method_not_allowed(ctx: RequestContext, _params: Params) -> Response {
    let mut response = (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response();
    if let Some(allowed) = ctx.get::<AllowedMethods>() {
        set_allow(&mut response, allowed);
    }
    response
}

pub fn options(allowed: &AllowedMethods) -> Response {
    let mut response = StatusCode::OK.into_response();
    set_allow(&mut response, allowed);
    response
}

fn set_allow(response: &mut Response, allowed: &AllowedMethods) {
    match HeaderValue::from_str(&allowed.header_value()) {
        Ok(value) => {
            response.headers_mut().insert(header::ALLOW, value);
        }
        Err(e) => tracing::warn!(allow = %allowed, error = %e, "Allow value is not a valid header"),
    }
}
