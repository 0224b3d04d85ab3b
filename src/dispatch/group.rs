//! Route groups: nested prefixes with inherited middleware.
//!
//! A group is a registration-time scope, never dispatched itself. A nested
//! group starts from its parent's prefix and middleware, so for a route
//! registered three levels deep:
//!
//! ```text
//! pattern    = parent prefix + group prefix + route pattern
//! middleware = parent mw ++ group mw ++ route mw
//! ```
//!
//! Group middleware is captured when a route is registered; adding
//! middleware to a group later does not reach routes already registered.

use std::sync::Arc;

use axum::http::Method;

use crate::dispatch::builder::{RouteOptions, RouteRegistrar, RouterBuilder};
use crate::pipeline::{boxed, Handler, Middleware, SharedMiddleware};
use crate::routing::{RegisterError, RouteId};

pub struct Group<'a> {
    builder: &'a mut RouterBuilder,
    prefix: String,
    middleware: Vec<SharedMiddleware>,
}

impl<'a> Group<'a> {
    pub(crate) fn new(
        builder: &'a mut RouterBuilder,
        prefix: String,
        middleware: Vec<SharedMiddleware>,
    ) -> Self {
        Self {
            builder,
            prefix,
            middleware,
        }
    }

    /// Full prefix including all enclosing groups.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn layer<M: Middleware>(&mut self, middleware: M) -> &mut Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Open a nested group.
    pub fn group(&mut self, prefix: &str) -> Group<'_> {
        let prefix = join_paths(&self.prefix, prefix);
        Group::new(&mut *self.builder, prefix, self.middleware.clone())
    }

    pub fn mount<H: Handler>(&mut self, prefix: &str, target: H) -> Result<(), RegisterError> {
        let prefix = join_paths(&self.prefix, prefix);
        self.builder
            .add_mount(&prefix, boxed(target), self.middleware.clone())
    }
}

impl RouteRegistrar for Group<'_> {
    fn register<H: Handler>(
        &mut self,
        method: Method,
        pattern: &str,
        handler: H,
        options: RouteOptions,
    ) -> Result<RouteId, RegisterError> {
        let pattern = join_paths(&self.prefix, pattern);
        let middleware = self
            .middleware
            .iter()
            .chain(&options.middleware)
            .cloned()
            .collect();
        self.builder
            .add_route(method, &pattern, boxed(handler), options.name, middleware)
    }
}

/// Concatenate a prefix and a sub-pattern with exactly one separator
/// between them. Only one trailing and one leading `/` are absorbed, so
/// empty components still reach the pattern compiler.
pub fn join_paths(prefix: &str, path: &str) -> String {
    let prefix = prefix.strip_prefix('/').unwrap_or(prefix);
    let prefix = prefix.strip_suffix('/').unwrap_or(prefix);
    let path = path.strip_prefix('/').unwrap_or(path);

    match (prefix.is_empty(), path.is_empty()) {
        (true, true) => "/".to_string(),
        (false, true) => format!("/{prefix}"),
        (true, false) => format!("/{path}"),
        (false, false) => format!("/{prefix}/{path}"),
    }
}
