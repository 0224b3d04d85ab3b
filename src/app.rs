//! Bundled demo application served by the `switchyard` binary.
//!
//! ```text
//! GET  /health                  liveness
//! GET  /users/:id(\d+)          user by numeric id      (name: user)
//! GET  /users/*rest             user lookup fallback    (name: user_lookup)
//! GET  /admin/status            bearer-guarded group
//! POST /admin/echo              bearer-guarded group
//! *    /static/...              mount, echoes the stripped path
//! ```

use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use switchyard::config::DispatchOptions;
use switchyard::dispatch::{Dispatcher, OriginalPath, RouteOptions, RouteRegistrar, RouterBuilder};
use switchyard::middleware::{AccessLog, Recovery, RequestId, RequestIdMiddleware};
use switchyard::pipeline::{from_fn, Next, RequestContext};
use switchyard::routing::{Params, RegisterError};

pub const ADMIN_TOKEN: &str = "Bearer switchyard-admin";

pub fn build(options: DispatchOptions) -> Result<Dispatcher, RegisterError> {
    let mut builder = RouterBuilder::with_options(options);
    builder
        .layer(Recovery)
        .layer(RequestIdMiddleware)
        .layer(AccessLog);

    builder.get("/health", health)?;
    builder.register(Method::GET, r"/users/:id(\d+)", user_by_id, RouteOptions::named("user"))?;
    builder.register(Method::GET, "/users/*rest", user_lookup, RouteOptions::named("user_lookup"))?;

    {
        let mut admin = builder.group("/admin");
        admin.layer(from_fn(require_admin));
        admin.get("/status", admin_status)?;
        admin.post("/echo", echo_body)?;
    }

    builder.mount("/static", static_files)?;
    Ok(builder.build())
}

async fn health(_: RequestContext, _: Params) -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn user_by_id(_: RequestContext, params: Params) -> Response {
    match params.parse::<u64>("id") {
        Ok(id) => Json(json!({ "id": id })).into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}

async fn user_lookup(_: RequestContext, params: Params) -> Json<serde_json::Value> {
    Json(json!({ "lookup": params.get("rest").unwrap_or_default() }))
}

async fn require_admin(ctx: RequestContext, params: Params, next: Next) -> Response {
    let authorized = ctx
        .headers()
        .get(header::AUTHORIZATION)
        .is_some_and(|v| v.as_bytes() == ADMIN_TOKEN.as_bytes());
    if !authorized {
        tracing::warn!(path = %ctx.path(), "Rejected unauthenticated admin request");
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }
    next.run(ctx, params).await
}

async fn admin_status(ctx: RequestContext, _: Params) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "request_id": ctx.get::<RequestId>().map(RequestId::as_str),
    }))
}

async fn echo_body(ctx: RequestContext, _: Params) -> Response {
    match axum::body::to_bytes(ctx.into_request().into_body(), 64 * 1024).await {
        Ok(bytes) => bytes.into_response(),
        Err(e) => (StatusCode::PAYLOAD_TOO_LARGE, e.to_string()).into_response(),
    }
}

async fn static_files(ctx: RequestContext, _: Params) -> String {
    let original = ctx.get::<OriginalPath>().map(|p| p.0.as_str()).unwrap_or("");
    format!("{} (from {})", ctx.path(), original)
}
