//! Mounts: delegation of a static path prefix to an external handler.
//!
//! The core strips the matched prefix and hands the rest of the path and
//! the request to the mounted handler unchanged.
//!
//! Mounts are a fallback: the dispatcher consults them only after the route
//! table misses (404 or 405). A route under a mount's prefix therefore wins
//! over the mount, whether it was registered before or after it.

use axum::http::uri::{PathAndQuery, Uri};

use crate::pipeline::{BoxHandler, RequestContext, SharedMiddleware};
use crate::routing::{Pattern, RegisterError, Segment};

/// Request path as received, before a mount rewrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalPath(pub String);

pub(crate) struct Mount {
    prefix: String,
    components: Vec<String>,
    target: BoxHandler,
    middleware: Vec<SharedMiddleware>,
}

impl Mount {
    pub(crate) fn new(
        prefix: &str,
        target: BoxHandler,
        middleware: Vec<SharedMiddleware>,
    ) -> Result<Self, RegisterError> {
        let pattern = Pattern::compile(prefix)?;
        let components = pattern
            .segments()
            .iter()
            .map(|segment| match segment {
                Segment::Static(literal) => Ok(literal.clone()),
                _ => Err(RegisterError::InvalidMountPrefix(prefix.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            prefix: pattern.to_string(),
            components,
            target,
            middleware,
        })
    }

    pub(crate) fn prefix(&self) -> &str {
        &self.prefix
    }

    pub(crate) fn target(&self) -> &BoxHandler {
        &self.target
    }

    pub(crate) fn middleware(&self) -> &[SharedMiddleware] {
        &self.middleware
    }

    /// Remaining path if `components` start with this mount's prefix.
    pub(crate) fn strip(&self, components: &[&str]) -> Option<String> {
        let n = self.components.len();
        if components.len() < n {
            return None;
        }
        let prefix_ok = self
            .components
            .iter()
            .zip(components)
            .all(|(want, got)| want == got);
        prefix_ok.then(|| format!("/{}", components[n..].join("/")))
    }
}

/// Point the request at `remainder`, keeping the query string.
pub(crate) fn rewrite_path(ctx: &mut RequestContext, remainder: &str) {
    let original = ctx.request().uri().clone();
    let path_and_query = match original.query() {
        Some(query) => format!("{remainder}?{query}"),
        None => remainder.to_string(),
    };

    let mut parts = original.clone().into_parts();
    let rewritten = PathAndQuery::try_from(path_and_query)
        .ok()
        .and_then(|pq| {
            parts.path_and_query = Some(pq);
            Uri::from_parts(parts).ok()
        });

    match rewritten {
        Some(uri) => {
            ctx.insert(OriginalPath(original.path().to_string()));
            *ctx.request_mut().uri_mut() = uri;
        }
        None => tracing::warn!(path = %original.path(), remainder, "Could not rewrite mounted path"),
    }
}
