//! Classroom Observability
//!
//! - Structured logging with `tracing`, rolling log files and OpenTelemetry export
//! - Prometheus metrics for HTTP traffic and domain events
//! - Per-request logging middleware
//!
//! The `observability` feature (default) compiles the file, OpenTelemetry and
//! Prometheus layers. At runtime `OBSERVABILITY_ENABLED=false` turns them off
//! and leaves console logging only. Without the feature every tracking call
//! is a no-op.
//!
//! # Examples
//!
//! ```no_run
//! use classroom_observability::{init_tracing, shutdown_tracer};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     // ... application code ...
//!     shutdown_tracer().await;
//! }
//! ```

pub mod basic_logging;
pub mod middleware;

#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

use std::sync::OnceLock;

pub use middleware::{REQUEST_ID_HEADER, logging_middleware};

#[cfg(feature = "observability")]
pub use metrics_exporter_prometheus::PrometheusHandle;

#[cfg(feature = "observability")]
pub use logging::{init_tracing, shutdown_tracer};
#[cfg(feature = "observability")]
pub use metrics::{
    init_metrics, metrics_app, metrics_middleware, metrics_router, track_class_created,
    track_storage_error, track_student_created, track_student_enrolled, track_teacher_assigned,
    track_teacher_created,
};

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Whether the full observability stack is active.
///
/// Read once from `OBSERVABILITY_ENABLED` (enabled unless `false` or `0`).
/// Always `false` when the feature is not compiled.
pub fn is_observability_enabled() -> bool {
    if !cfg!(feature = "observability") {
        return false;
    }

    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| !v.eq_ignore_ascii_case("false") && v != "0")
            .unwrap_or(true)
    })
}

// No-op stubs when observability is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{Router, extract::Request, middleware::Next, response::Response};

    /// Console logging only.
    pub fn init_tracing() {
        crate::basic_logging::init_basic_console_logging();
    }

    pub async fn shutdown_tracer() {}

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub fn init_metrics() -> Option<()> {
        None
    }

    pub fn metrics_router() -> Option<Router> {
        None
    }

    pub fn track_teacher_created() {}
    pub fn track_student_created() {}
    pub fn track_class_created() {}
    pub fn track_teacher_assigned() {}
    pub fn track_student_enrolled() {}
    pub fn track_storage_error(_entity: &str, _kind: &str) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
