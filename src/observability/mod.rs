//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! builder / dispatcher / middleware produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (dispatch counters and histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the request context, not global state
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::{init_metrics, record_dispatch};
