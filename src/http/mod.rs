//! HTTP hosting subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum, TraceLayer, TimeoutLayer)
//!     → DispatcherHandle::load (current snapshot)
//!     → Dispatcher::serve
//!     → route pipeline | mount | response.rs fallbacks
//!     → Send to client
//! ```

pub mod response;
pub mod server;

pub use server::{AppState, HttpServer};
