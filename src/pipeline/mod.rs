//! Request pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! [global mw] ++ [group mw] ++ [route mw] + handler
//!     → middleware.rs compose (first element outermost)
//!     → one BoxHandler per route
//!     → invoked with (RequestContext, Params)
//! ```

pub mod handler;
pub mod middleware;

pub use handler::{boxed, BoxHandler, Handler, RequestContext};
pub use middleware::{compose, from_fn, FromFn, Middleware, Next, SharedMiddleware};
