//! HTTP request routing and middleware dispatch.
//!
//! Routes are registered on a [`RouterBuilder`](dispatch::RouterBuilder),
//! frozen into an immutable [`Dispatcher`](dispatch::Dispatcher) and served
//! through a swappable [`DispatcherHandle`](dispatch::DispatcherHandle).

// Core
pub mod dispatch;
pub mod pipeline;
pub mod routing;

// Hosting
pub mod http;
pub mod middleware;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use dispatch::{Dispatcher, DispatcherHandle, RouteOptions, RouteRegistrar, RouterBuilder};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use pipeline::{from_fn, Middleware, Next, RequestContext};
pub use routing::Params;
