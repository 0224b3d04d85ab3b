//! Route matching logic.
//!
//! # Responsibilities
//! - Split the request path into components
//! - Walk the method's routes in registration order, first match wins
//! - Explain a miss: another method matches (405) or nothing does (404)
//!
//! # Design Decisions
//! - Paths are compared raw, no percent-decoding
//! - Static prefix is compared before any capture is recorded
//! - Linear scan; route counts are in the hundreds

use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::routing::params::Params;
use crate::routing::pattern::{Pattern, Segment};
use crate::routing::table::{Route, RouteTable};

/// Result of looking up a method and path.
#[derive(Debug)]
pub enum MatchOutcome<'a> {
    Matched { route: &'a Arc<Route>, params: Params },
    MethodNotAllowed(AllowedMethods),
    NotFound,
}

impl MatchOutcome<'_> {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            MatchOutcome::Matched { .. } => "matched",
            MatchOutcome::MethodNotAllowed(_) => "method_not_allowed",
            MatchOutcome::NotFound => "not_found",
        }
    }
}

/// Sorted, de-duplicated set of methods, rendered as an `Allow` value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedMethods(Vec<Method>);

impl AllowedMethods {
    /// Methods in `Allow` order.
    pub fn methods(&self) -> &[Method] {
        &self.0
    }

    /// Whether `method` has a structural match.
    pub fn contains(&self, method: &Method) -> bool {
        self.0.contains(method)
    }

    /// True when no method matches, i.e. a 404.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-joined method names, e.g. `GET, POST`.
    pub fn header_value(&self) -> String {
        self.0
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<Method> for AllowedMethods {
    fn from_iter<I: IntoIterator<Item = Method>>(iter: I) -> Self {
        let mut methods: Vec<Method> = iter.into_iter().collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods.dedup();
        Self(methods)
    }
}

impl fmt::Display for AllowedMethods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header_value())
    }
}

/// Split a request path into components. A single leading `/` is optional
/// and the root path has no components.
pub fn split_path(path: &str) -> Vec<&str> {
    let body = path.strip_prefix('/').unwrap_or(path);
    if body.is_empty() {
        Vec::new()
    } else {
        body.split('/').collect()
    }
}

impl Pattern {
    /// Structural match against path components, capturing params on success.
    pub fn capture(&self, components: &[&str]) -> Option<Params> {
        let mut params = Params::new();
        self.walk(components, Some(&mut params)).then_some(params)
    }

    /// Structural match without recording params.
    pub fn is_match(&self, components: &[&str]) -> bool {
        self.walk(components, None)
    }

    fn walk(&self, components: &[&str], mut out: Option<&mut Params>) -> bool {
        let fixed = self.fixed_len();
        let count_ok = if self.has_wildcard() {
            components.len() >= fixed
        } else {
            components.len() == fixed
        };
        if !count_ok {
            return false;
        }

        let segments = self.segments();
        let prefix = self.static_prefix_len();
        let prefix_ok = segments[..prefix]
            .iter()
            .zip(components)
            .all(|(seg, comp)| matches!(seg, Segment::Static(lit) if lit == comp));
        if !prefix_ok {
            return false;
        }

        for (seg, comp) in segments[prefix..fixed].iter().zip(&components[prefix..fixed]) {
            match seg {
                Segment::Static(lit) => {
                    if lit != comp {
                        return false;
                    }
                }
                Segment::Param { name } => {
                    if comp.is_empty() {
                        return false;
                    }
                    if let Some(params) = out.as_deref_mut() {
                        params.insert(name.as_str(), *comp);
                    }
                }
                Segment::Regex { name, regex, .. } => {
                    if comp.is_empty() || !regex.is_match(comp) {
                        return false;
                    }
                    if let Some(params) = out.as_deref_mut() {
                        params.insert(name.as_str(), *comp);
                    }
                }
                // never inside the fixed part
                Segment::Wildcard { .. } => return false,
            }
        }

        if let (Some(Segment::Wildcard { name }), Some(params)) = (segments.last(), out) {
            params.insert(name.as_str(), components[fixed..].join("/"));
        }
        true
    }
}

impl RouteTable {
    /// Find the first route registered for `method` that matches `path`.
    pub fn match_route(&self, method: &Method, path: &str) -> MatchOutcome<'_> {
        let components = split_path(path);

        for route in self.routes_for(method) {
            if let Some(params) = route.pattern().capture(&components) {
                return MatchOutcome::Matched { route, params };
            }
        }

        let allowed = self.allowed_for(&components);
        if allowed.is_empty() {
            MatchOutcome::NotFound
        } else {
            MatchOutcome::MethodNotAllowed(allowed)
        }
    }

    /// Every method with at least one route structurally matching `path`.
    pub fn allowed_methods(&self, path: &str) -> AllowedMethods {
        self.allowed_for(&split_path(path))
    }

    fn allowed_for(&self, components: &[&str]) -> AllowedMethods {
        self.by_method
            .iter()
            .filter(|(_, routes)| routes.iter().any(|r| r.pattern().is_match(components)))
            .map(|(method, _)| method.clone())
            .collect()
    }
}
