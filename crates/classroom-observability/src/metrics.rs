use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use crate::is_observability_enabled;

static PROMETHEUS: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

fn install_recorder() -> Option<PrometheusHandle> {
    let builder = match PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full("http_request_duration_seconds".to_string()),
        LATENCY_BUCKETS,
    ) {
        Ok(builder) => builder,
        Err(e) => {
            tracing::error!(error = %e, "Invalid histogram buckets");
            return None;
        }
    };

    let handle = match builder.install_recorder() {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Prometheus recorder");
            return None;
        }
    };

    // Upkeep drains histogram buffers; only possible inside a runtime.
    if let Ok(runtime) = tokio::runtime::Handle::try_current() {
        let upkeep_handle = handle.clone();
        runtime.spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(5)).await;
                upkeep_handle.run_upkeep();
            }
        });
    }

    Some(handle)
}

/// Installs the Prometheus recorder on first call and returns its handle.
/// `None` when observability is disabled or installation failed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    if !is_observability_enabled() {
        return None;
    }

    PROMETHEUS.get_or_init(install_recorder).clone()
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    let status_category = match status {
        200..=299 => "2xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    };
    counter!("http_requests_by_status", "status_category" => status_category).increment(1);

    gauge!("http_requests_active").decrement(1.0);

    response
}

pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

/// `/metrics` route, when a recorder is installed.
pub fn metrics_router() -> Option<Router> {
    init_metrics().map(metrics_app)
}

// Domain counters

pub fn track_teacher_created() {
    if !is_observability_enabled() {
        return;
    }
    counter!("teachers_created_total").increment(1);
}

pub fn track_student_created() {
    if !is_observability_enabled() {
        return;
    }
    counter!("students_created_total").increment(1);
}

pub fn track_class_created() {
    if !is_observability_enabled() {
        return;
    }
    counter!("classes_created_total").increment(1);
}

pub fn track_teacher_assigned() {
    if !is_observability_enabled() {
        return;
    }
    counter!("class_assignments_total", "relation" => "teacher").increment(1);
}

pub fn track_student_enrolled() {
    if !is_observability_enabled() {
        return;
    }
    counter!("class_assignments_total", "relation" => "student").increment(1);
}

/// Constraint violations and connection failures, by entity and category.
pub fn track_storage_error(entity: &str, kind: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("storage_errors_total", "entity" => entity.to_string(), "kind" => kind.to_string())
        .increment(1);
}
