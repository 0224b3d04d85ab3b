//! Stock middleware built on the pipeline contract.
//!
//! # Data Flow
//! ```text
//! Recovery (outermost: catches panics from everything inside)
//!     → RequestIdMiddleware (x-request-id in, RequestId extension, header out)
//!     → AccessLog (method, path, status, elapsed)
//!     → group / route middleware
//!     → handler
//! ```
//!
//! Each type implements [`Middleware`](crate::pipeline::Middleware) and can
//! be installed globally, on a group, or per route.

pub mod access_log;
pub mod recovery;
pub mod request_id;

pub use access_log::AccessLog;
pub use recovery::Recovery;
pub use request_id::{RequestId, RequestIdMiddleware, X_REQUEST_ID};
