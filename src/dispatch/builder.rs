//! Registration-time router builder.
//!
//! All registration happens here, on one thread, before traffic. `build`
//! freezes the table into an immutable [`Dispatcher`].

use std::sync::Arc;

use axum::http::Method;

use crate::config::DispatchOptions;
use crate::dispatch::dispatcher::Dispatcher;
use crate::dispatch::group::{join_paths, Group};
use crate::dispatch::mount::Mount;
use crate::pipeline::{boxed, BoxHandler, Handler, Middleware, SharedMiddleware};
use crate::routing::{Pattern, RegisterError, RouteId, RouteTable};

/// Optional per-route settings: a unique name and route middleware.
#[derive(Default, Clone)]
pub struct RouteOptions {
    pub(crate) name: Option<String>,
    pub(crate) middleware: Vec<SharedMiddleware>,
}

impl RouteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new().name(name)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append route middleware; earlier calls are outermost.
    pub fn layer<M: Middleware>(mut self, middleware: M) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn layer_shared(mut self, middleware: SharedMiddleware) -> Self {
        self.middleware.push(middleware);
        self
    }
}

/// Anything routes can be registered through: the builder itself or a group.
pub trait RouteRegistrar {
    fn register<H: Handler>(
        &mut self,
        method: Method,
        pattern: &str,
        handler: H,
        options: RouteOptions,
    ) -> Result<RouteId, RegisterError>;

    fn get<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<RouteId, RegisterError> {
        self.register(Method::GET, pattern, handler, RouteOptions::default())
    }

    fn post<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<RouteId, RegisterError> {
        self.register(Method::POST, pattern, handler, RouteOptions::default())
    }

    fn put<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<RouteId, RegisterError> {
        self.register(Method::PUT, pattern, handler, RouteOptions::default())
    }

    fn patch<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<RouteId, RegisterError> {
        self.register(Method::PATCH, pattern, handler, RouteOptions::default())
    }

    fn delete<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<RouteId, RegisterError> {
        self.register(Method::DELETE, pattern, handler, RouteOptions::default())
    }
}

/// Collects routes, middleware, mounts and fallbacks.
#[derive(Default)]
pub struct RouterBuilder {
    table: RouteTable,
    global: Vec<SharedMiddleware>,
    mounts: Vec<Mount>,
    not_found: Option<BoxHandler>,
    method_not_allowed: Option<BoxHandler>,
    options: DispatchOptions,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DispatchOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Router-global middleware, outermost for every route.
    pub fn layer<M: Middleware>(&mut self, middleware: M) -> &mut Self {
        self.global.push(Arc::new(middleware));
        self
    }

    /// Open a group. Routes registered through it get the prefix and the
    /// group's middleware.
    pub fn group(&mut self, prefix: &str) -> Group<'_> {
        let prefix = join_paths(prefix, "");
        Group::new(self, prefix, Vec::new())
    }

    /// Delegate everything under `prefix` to an external handler.
    pub fn mount<H: Handler>(&mut self, prefix: &str, target: H) -> Result<(), RegisterError> {
        self.add_mount(prefix, boxed(target), Vec::new())
    }

    pub fn not_found<H: Handler>(&mut self, handler: H) -> &mut Self {
        self.not_found = Some(boxed(handler));
        self
    }

    pub fn method_not_allowed<H: Handler>(&mut self, handler: H) -> &mut Self {
        self.method_not_allowed = Some(boxed(handler));
        self
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub(crate) fn add_route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: BoxHandler,
        name: Option<String>,
        middleware: Vec<SharedMiddleware>,
    ) -> Result<RouteId, RegisterError> {
        let compiled = Pattern::compile(pattern)?;
        let route = self
            .table
            .register(method, compiled, middleware, handler, name)?;
        Ok(route.id())
    }

    pub(crate) fn add_mount(
        &mut self,
        prefix: &str,
        target: BoxHandler,
        middleware: Vec<SharedMiddleware>,
    ) -> Result<(), RegisterError> {
        let mount = Mount::new(prefix, target, middleware)?;
        tracing::debug!(prefix = %mount.prefix(), "Mount registered");
        self.mounts.push(mount);
        Ok(())
    }

    /// Freeze into an immutable dispatcher.
    pub fn build(self) -> Dispatcher {
        tracing::info!(
            routes = self.table.len(),
            mounts = self.mounts.len(),
            global_middleware = self.global.len(),
            "Dispatcher built"
        );
        Dispatcher::new(
            self.table,
            &self.global,
            self.mounts,
            self.not_found,
            self.method_not_allowed,
            self.options,
        )
    }
}

impl RouteRegistrar for RouterBuilder {
    fn register<H: Handler>(
        &mut self,
        method: Method,
        pattern: &str,
        handler: H,
        options: RouteOptions,
    ) -> Result<RouteId, RegisterError> {
        self.add_route(method, pattern, boxed(handler), options.name, options.middleware)
    }
}
