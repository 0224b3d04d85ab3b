//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Setup (single thread):
//!     RouterBuilder / Group (register, layer, mount)
//!     → build() composes every pipeline
//!     → Dispatcher (immutable)
//!     → DispatcherHandle (published snapshot)
//!
//! Per request:
//!     DispatcherHandle::load → Dispatcher::serve(method, path, ctx)
//!     → auto-OPTIONS? → Allow response
//!     → match → route pipeline
//!     → miss → mount delegate | 405 fallback | 404 fallback
//! ```

pub mod builder;
pub mod dispatcher;
pub mod group;
pub mod handle;
pub mod mount;

pub use builder::{RouteOptions, RouteRegistrar, RouterBuilder};
pub use dispatcher::Dispatcher;
pub use group::{join_paths, Group};
pub use handle::DispatcherHandle;
pub use mount::OriginalPath;
