//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (setup phase):
//!     pattern string
//!     → pattern.rs (compile into typed segments, fail fast)
//!     → table.rs (append to per-method list, assign registration index)
//!     → url.rs (index by name if named)
//!
//! Incoming Request (method, path)
//!     → matcher.rs (walk routes for method in registration order)
//!     → Return: Matched(route, params) | MethodNotAllowed(allowed) | NotFound
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - First match wins (registration order), no "most specific" ranking

pub mod error;
pub mod matcher;
pub mod params;
pub mod pattern;
pub mod table;
pub mod url;

pub use error::{CompileError, ParamError, RegisterError, UrlError};
pub use matcher::{split_path, AllowedMethods, MatchOutcome};
pub use params::Params;
pub use pattern::{Pattern, Segment};
pub use table::{Route, RouteId, RouteInfo, RouteTable};
