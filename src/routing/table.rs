//! Routes and the per-method route table.
//!
//! # Design Decisions
//! - Insertion order is preserved per method and decides match precedence
//! - Registration index is global and monotonically increasing
//! - Named routes are checked before anything is appended, so a failed
//!   registration leaves the table untouched

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::Method;
use serde::Serialize;

use crate::pipeline::{BoxHandler, SharedMiddleware};
use crate::routing::error::RegisterError;
use crate::routing::pattern::Pattern;
use crate::routing::url::NamedRoutes;

/// Registration index of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RouteId(usize);

impl RouteId {
    /// Position in registration order, starting at 0.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A registered route. Immutable after creation.
pub struct Route {
    id: RouteId,
    method: Method,
    pattern: Pattern,
    middleware: Vec<SharedMiddleware>,
    handler: BoxHandler,
    name: Option<String>,
}

impl Route {
    /// Registration index, the tie-break between overlapping routes.
    pub fn id(&self) -> RouteId {
        self.id
    }

    /// Method this route answers.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Compiled pattern, including any group prefix.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Group and per-route middleware, outermost first. Router-global
    /// middleware is applied by the dispatcher.
    pub fn middleware(&self) -> &[SharedMiddleware] {
        &self.middleware
    }

    /// Terminal handler, without any middleware.
    pub fn handler(&self) -> &BoxHandler {
        &self.handler
    }

    /// Name used for URL building, if registered with one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Serializable summary for listings.
    pub fn info(&self) -> RouteInfo {
        RouteInfo {
            id: self.id,
            method: self.method.to_string(),
            pattern: self.pattern.to_string(),
            name: self.name.clone(),
            middleware: self.middleware.len(),
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("id", &self.id)
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .field("name", &self.name)
            .field("middleware", &self.middleware.len())
            .finish()
    }
}

/// Serializable description of a route, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub id: RouteId,
    pub method: String,
    pub pattern: String,
    pub name: Option<String>,
    pub middleware: usize,
}

/// Compiled routes grouped by method, in registration order.
#[derive(Default)]
pub struct RouteTable {
    routes: Vec<Arc<Route>>,
    pub(crate) by_method: HashMap<Method, Vec<Arc<Route>>>,
    names: NamedRoutes,
}

impl RouteTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route with the next registration index.
    pub fn register(
        &mut self,
        method: Method,
        pattern: Pattern,
        middleware: Vec<SharedMiddleware>,
        handler: BoxHandler,
        name: Option<String>,
    ) -> Result<Arc<Route>, RegisterError> {
        if let Some(name) = &name {
            if self.names.contains(name) {
                return Err(RegisterError::DuplicateName(name.clone()));
            }
        }

        let route = Arc::new(Route {
            id: RouteId(self.routes.len()),
            method: method.clone(),
            pattern,
            middleware,
            handler,
            name,
        });

        tracing::debug!(
            id = route.id.index(),
            method = %route.method,
            pattern = %route.pattern,
            name = ?route.name,
            "Route registered"
        );

        self.routes.push(route.clone());
        self.by_method.entry(method).or_default().push(route.clone());
        if route.name.is_some() {
            self.names.insert(route.clone());
        }
        Ok(route)
    }

    /// All routes in registration order.
    pub fn routes(&self) -> &[Arc<Route>] {
        &self.routes
    }

    /// Look up a route by registration index.
    pub fn route(&self, id: RouteId) -> Option<&Arc<Route>> {
        self.routes.get(id.0)
    }

    /// Routes for one method, in registration order.
    pub fn routes_for(&self, method: &Method) -> &[Arc<Route>] {
        self.by_method.get(method).map(Vec::as_slice).unwrap_or_default()
    }

    /// Look up a route by name.
    pub fn named(&self, name: &str) -> Option<&Arc<Route>> {
        self.names.get(name)
    }

    pub(crate) fn names(&self) -> &NamedRoutes {
        &self.names
    }

    /// Number of registered routes across all methods.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no route has been registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Summaries of every route in registration order.
    pub fn info(&self) -> Vec<RouteInfo> {
        self.routes.iter().map(|r| r.info()).collect()
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.routes.iter()).finish()
    }
}
