//! Routing error types.
//!
//! Registration errors abort setup. URL-building errors are returned to the
//! caller. Dispatch never produces an error: every lookup resolves to a
//! [`MatchOutcome`](crate::routing::MatchOutcome).

use thiserror::Error;

/// Errors raised while compiling a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Malformed regex, empty component or otherwise unparseable pattern.
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A `*name` wildcard that is not the final component.
    #[error("wildcard must be the last component in `{pattern}`")]
    InvalidWildcardPosition { pattern: String },

    /// The same parameter name used twice in one pattern.
    #[error("parameter `{name}` appears more than once in `{pattern}`")]
    DuplicateParam { pattern: String, name: String },
}

impl CompileError {
    pub(crate) fn invalid(pattern: &str, reason: impl Into<String>) -> Self {
        CompileError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by the registration API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// A route with this name is already registered.
    #[error("route name `{0}` is already registered")]
    DuplicateName(String),

    /// Mount prefixes may only contain static components.
    #[error("mount prefix `{0}` must contain only static components")]
    InvalidMountPrefix(String),
}

/// Errors returned by the URL builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("no route named `{0}`")]
    UnknownRouteName(String),

    #[error("route expects {expected} parameter value(s), got {actual}")]
    ParamCountMismatch { expected: usize, actual: usize },

    #[error("value `{value}` rejected for parameter `{param}`: {reason}")]
    ParamValidationFailed {
        param: String,
        value: String,
        reason: String,
    },
}

/// Errors from typed parameter extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("missing path parameter `{0}`")]
    Missing(String),

    #[error("path parameter `{name}` = `{value}` is invalid: {reason}")]
    Invalid {
        name: String,
        value: String,
        reason: String,
    },
}
