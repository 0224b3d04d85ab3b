//! Metrics collection and exposition.
//!
//! # Metrics
//! - `switchyard_dispatch_total` (counter): dispatches by method, outcome
//! - `switchyard_dispatch_duration_seconds` (histogram): latency by outcome
//!
//! Outcomes are `matched`, `mounted`, `not_found`, `method_not_allowed`
//! and `auto_options`.
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - Method label is bounded: extension methods share the `other` label

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::Method;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const DISPATCH_TOTAL: &str = "switchyard_dispatch_total";
pub const DISPATCH_DURATION: &str = "switchyard_dispatch_duration_seconds";

/// Install the Prometheus recorder with a scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one completed dispatch.
pub fn record_dispatch(method: &Method, outcome: &'static str, start: Instant) {
    let elapsed = start.elapsed().as_secs_f64();
    metrics::counter!(
        DISPATCH_TOTAL,
        "method" => method_label(method),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!(DISPATCH_DURATION, "outcome" => outcome).record(elapsed);
}

/// Standard methods by name, everything else as `other`.
pub fn method_label(method: &Method) -> &'static str {
    match method.as_str() {
        "GET" => "GET",
        "POST" => "POST",
        "PUT" => "PUT",
        "PATCH" => "PATCH",
        "DELETE" => "DELETE",
        "HEAD" => "HEAD",
        "OPTIONS" => "OPTIONS",
        "CONNECT" => "CONNECT",
        "TRACE" => "TRACE",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_methods_share_one_label() {
        assert_eq!(method_label(&Method::GET), "GET");
        assert_eq!(method_label(&Method::TRACE), "TRACE");

        let purge = Method::from_bytes(b"PURGE").unwrap();
        let random = Method::from_bytes(b"X-RANDOM-1234").unwrap();
        assert_eq!(method_label(&purge), "other");
        assert_eq!(method_label(&random), "other");
    }

    #[test]
    fn test_record_without_recorder_is_noop() {
        let custom = Method::from_bytes(b"PURGE").unwrap();
        record_dispatch(&custom, "not_found", Instant::now());
    }
}
