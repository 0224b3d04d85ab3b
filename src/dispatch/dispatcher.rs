//! Request dispatch.
//!
//! # Responsibilities
//! - Match method + path against the frozen route table
//! - Run the route's composed pipeline (global ++ group ++ route, handler)
//! - Delegate unmatched paths under a mount point
//! - Produce 404 / 405 / auto-OPTIONS outcomes
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Pipelines composed once at build time, indexed by registration index
//! - Matched routes win over mounts; mounts win over 404/405
//! - Auto-OPTIONS bypasses every middleware and handler

use std::time::Instant;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;

use crate::config::DispatchOptions;
use crate::dispatch::mount::{rewrite_path, Mount};
use crate::http::response;
use crate::observability::metrics;
use crate::pipeline::{boxed, compose, BoxHandler, RequestContext, SharedMiddleware};
use crate::routing::{split_path, MatchOutcome, Params, RouteTable, UrlError};

struct MountPoint {
    mount: Mount,
    pipeline: BoxHandler,
}

/// The single request-handling entry point.
pub struct Dispatcher {
    table: RouteTable,
    pipelines: Vec<BoxHandler>,
    mounts: Vec<MountPoint>,
    not_found: BoxHandler,
    method_not_allowed: BoxHandler,
    options: DispatchOptions,
}

impl Dispatcher {
    pub(crate) fn new(
        table: RouteTable,
        global: &[SharedMiddleware],
        mounts: Vec<Mount>,
        not_found: Option<BoxHandler>,
        method_not_allowed: Option<BoxHandler>,
        options: DispatchOptions,
    ) -> Self {
        let chain = |scoped: &[SharedMiddleware]| -> Vec<SharedMiddleware> {
            global.iter().chain(scoped).cloned().collect()
        };

        let pipelines = table
            .routes()
            .iter()
            .map(|route| compose(&chain(route.middleware()), route.handler().clone()))
            .collect();

        let mounts = mounts
            .into_iter()
            .map(|mount| MountPoint {
                pipeline: compose(&chain(mount.middleware()), mount.target().clone()),
                mount,
            })
            .collect();

        let not_found = not_found.unwrap_or_else(|| boxed(response::not_found));
        let method_not_allowed =
            method_not_allowed.unwrap_or_else(|| boxed(response::method_not_allowed));

        Self {
            pipelines,
            mounts,
            not_found: compose(global, not_found),
            method_not_allowed: compose(global, method_not_allowed),
            table,
            options,
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    pub fn url_for<V: AsRef<str>>(&self, name: &str, values: &[V]) -> Result<String, UrlError> {
        self.table.url_for(name, values)
    }

    pub fn url_for_params(&self, name: &str, params: &Params) -> Result<String, UrlError> {
        self.table.url_for_params(name, params)
    }

    /// Dispatch a full request, taking method and path from it.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        self.serve(&method, &path, RequestContext::new(request)).await
    }

    /// Dispatch `method` + `path` with an explicit request context.
    pub async fn serve(&self, method: &Method, path: &str, ctx: RequestContext) -> Response {
        let start = Instant::now();
        let path = self.normalize(path);

        if self.options.auto_options && *method == Method::OPTIONS {
            let allowed = self.table.allowed_methods(path);
            if !allowed.is_empty() {
                tracing::debug!(path = %path, allow = %allowed, "Answering OPTIONS");
                metrics::record_dispatch(method, "auto_options", start);
                return response::options(&allowed);
            }
        }

        let (outcome, response) = match self.table.match_route(method, path) {
            MatchOutcome::Matched { route, params } => {
                tracing::debug!(
                    method = %method,
                    path = %path,
                    route = route.id().index(),
                    pattern = %route.pattern(),
                    "Route matched"
                );
                let pipeline = &self.pipelines[route.id().index()];
                ("matched", pipeline.call(ctx, params).await)
            }
            miss => self.fallback(miss, method, path, ctx).await,
        };

        metrics::record_dispatch(method, outcome, start);
        response
    }

    async fn fallback(
        &self,
        miss: MatchOutcome<'_>,
        method: &Method,
        path: &str,
        mut ctx: RequestContext,
    ) -> (&'static str, Response) {
        let components = split_path(path);
        for point in &self.mounts {
            if let Some(remainder) = point.mount.strip(&components) {
                tracing::debug!(
                    path = %path,
                    mount = %point.mount.prefix(),
                    remainder = %remainder,
                    "Delegating to mount"
                );
                rewrite_path(&mut ctx, &remainder);
                return ("mounted", point.pipeline.call(ctx, Params::new()).await);
            }
        }

        match miss {
            MatchOutcome::MethodNotAllowed(allowed) => {
                tracing::warn!(method = %method, path = %path, allow = %allowed, "Method not allowed");
                ctx.insert(allowed);
                (
                    "method_not_allowed",
                    self.method_not_allowed.call(ctx, Params::new()).await,
                )
            }
            _ => {
                tracing::warn!(method = %method, path = %path, "No route matched");
                ("not_found", self.not_found.call(ctx, Params::new()).await)
            }
        }
    }

    fn normalize<'p>(&self, path: &'p str) -> &'p str {
        if self.options.ignore_trailing_slash && path.len() > 1 {
            path.strip_suffix('/').unwrap_or(path)
        } else {
            path
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{RouteOptions, RouteRegistrar, RouterBuilder};
    use crate::pipeline::{from_fn, Next};
    use crate::routing::AllowedMethods;
    use axum::http::{header, StatusCode};
    use std::sync::{Arc, Mutex};

    async fn body_string(res: Response) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn ctx(method: Method, path: &str) -> RequestContext {
        RequestContext::new(
            Request::builder()
                .method(method)
                .uri(path)
                .body(Body::empty())
                .unwrap(),
        )
    }

    async fn call(d: &Dispatcher, method: Method, path: &str) -> Response {
        d.serve(&method, path, ctx(method.clone(), path)).await
    }

    async fn echo_path(ctx: RequestContext, _: Params) -> String {
        ctx.path().to_string()
    }

    #[tokio::test]
    async fn test_default_fallbacks() {
        let mut builder = RouterBuilder::new();
        builder.get("/x", echo_path).unwrap();
        builder.post("/y", echo_path).unwrap();
        let d = builder.build();

        let res = call(&d, Method::PUT, "/x").await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.headers()[header::ALLOW], "GET");

        let res = call(&d, Method::DELETE, "/z").await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_custom_fallbacks_and_global_middleware() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();

        let mut builder = RouterBuilder::new();
        builder.layer(from_fn(move |ctx: RequestContext, params, next: Next| {
            let log = log.clone();
            async move {
                log.lock().unwrap().push(ctx.path().to_string());
                next.run(ctx, params).await
            }
        }));
        builder.get("/x", echo_path).unwrap();
        builder.not_found(|_: RequestContext, _: Params| async { (StatusCode::NOT_FOUND, "nothing here") });
        builder.method_not_allowed(|ctx: RequestContext, _: Params| async move {
            let allow = ctx.get::<AllowedMethods>().map(|a| a.header_value()).unwrap_or_default();
            (StatusCode::METHOD_NOT_ALLOWED, format!("try {allow}"))
        });
        let d = builder.build();

        assert_eq!(body_string(call(&d, Method::GET, "/nope").await).await, "nothing here");
        assert_eq!(body_string(call(&d, Method::POST, "/x").await).await, "try GET");
        assert_eq!(*seen.lock().unwrap(), ["/nope", "/x"]);
    }

    #[tokio::test]
    async fn test_auto_options_bypasses_pipeline() {
        let hits = Arc::new(Mutex::new(0));
        let counter = hits.clone();

        let mut builder = RouterBuilder::with_options(DispatchOptions {
            auto_options: true,
            ..DispatchOptions::default()
        });
        builder.layer(from_fn(move |ctx, params, next: Next| {
            *counter.lock().unwrap() += 1;
            next.run(ctx, params)
        }));
        builder.get("/x", echo_path).unwrap();
        builder.post("/x", echo_path).unwrap();
        let d = builder.build();

        let res = call(&d, Method::OPTIONS, "/x").await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::ALLOW], "GET, POST");
        assert!(body_string(res).await.is_empty());
        assert_eq!(*hits.lock().unwrap(), 0);

        // No structural match: regular 404
        let res = call(&d, Method::OPTIONS, "/missing").await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_auto_options_disabled_by_default() {
        let mut builder = RouterBuilder::new();
        builder.get("/x", echo_path).unwrap();
        let d = builder.build();

        let res = call(&d, Method::OPTIONS, "/x").await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_mount_strips_prefix() {
        let mut builder = RouterBuilder::new();
        builder.get("/static/version", |_: RequestContext, _: Params| async { "v1" }).unwrap();
        builder.mount("/static", echo_path).unwrap();
        let d = builder.build();

        assert_eq!(body_string(call(&d, Method::GET, "/static/version").await).await, "v1");
        assert_eq!(body_string(call(&d, Method::GET, "/static/css/a.css").await).await, "/css/a.css");
        assert_eq!(body_string(call(&d, Method::POST, "/static/version").await).await, "/version");
        assert_eq!(body_string(call(&d, Method::GET, "/static").await).await, "/");
        assert_eq!(call(&d, Method::GET, "/staticx").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_route_registered_after_mount_still_wins() {
        let mut builder = RouterBuilder::new();
        builder.mount("/static", echo_path).unwrap();
        builder.get("/static/health", |_: RequestContext, _: Params| async { "route" }).unwrap();
        let d = builder.build();

        assert_eq!(body_string(call(&d, Method::GET, "/static/health").await).await, "route");
        assert_eq!(body_string(call(&d, Method::GET, "/static/other").await).await, "/other");
    }

    #[tokio::test]
    async fn test_ignore_trailing_slash() {
        let mut builder = RouterBuilder::with_options(DispatchOptions {
            ignore_trailing_slash: true,
            ..DispatchOptions::default()
        });
        builder.get("/users", echo_path).unwrap();
        builder.get("/", |_: RequestContext, _: Params| async { "root" }).unwrap();
        let d = builder.build();

        assert_eq!(call(&d, Method::GET, "/users/").await.status(), StatusCode::OK);
        assert_eq!(body_string(call(&d, Method::GET, "/").await).await, "root");
    }

    #[tokio::test]
    async fn test_url_for_through_dispatcher() {
        let mut builder = RouterBuilder::new();
        builder
            .register(Method::GET, "/users/:id(\\d+)", echo_path, RouteOptions::named("user"))
            .unwrap();
        let d = builder.build();

        let url = d.url_for("user", &["7"]).unwrap();
        assert_eq!(body_string(call(&d, Method::GET, &url).await).await, "/users/7");
    }
}
