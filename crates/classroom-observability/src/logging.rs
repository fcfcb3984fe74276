use opentelemetry::{KeyValue, global, trace::TraceError};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    propagation::TraceContextPropagator,
    runtime,
    trace::{RandomIdGenerator, Sampler, Tracer},
};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use std::{fs, path::PathBuf};
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{basic_logging::init_basic_console_logging, is_observability_enabled};

const SERVICE: &str = "classroom";

fn log_dir() -> PathBuf {
    std::env::var("LOG_DIR")
        .ok()
        .filter(|d| !d.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("storage/logs"))
}

fn init_tracer(otlp_endpoint: String) -> Result<Tracer, TraceError> {
    info!(endpoint = %otlp_endpoint, "Initializing OpenTelemetry tracer");

    global::set_text_map_propagator(TraceContextPropagator::new());

    let resource = Resource::new(vec![
        KeyValue::new(SERVICE_NAME, SERVICE),
        KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
        KeyValue::new(
            "environment",
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        ),
    ]);

    let otlp_exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(otlp_endpoint);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(otlp_exporter)
        .with_trace_config(
            opentelemetry_sdk::trace::Config::default()
                .with_sampler(Sampler::AlwaysOn)
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(resource),
        )
        .install_batch(runtime::Tokio)
}

/// Installs the global subscriber.
///
/// Layers: console (`RUST_LOG` or crate-level `info`), daily-rolling error
/// log and JSON log under `LOG_DIR` (default `storage/logs`), and an OTLP
/// exporter when `OTEL_EXPORTER_OTLP_ENDPOINT` is set. If the log directory
/// cannot be created the file layers are skipped.
pub fn init_tracing() {
    if !is_observability_enabled() {
        init_basic_console_logging();
        return;
    }

    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            "classroom=info,classroom_core=info,classroom_db=info,\
             classroom_observability=info,tower_http=warn,hyper=info,tonic=info,sqlx=warn",
        )
    });

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter);

    let dir = log_dir();
    let file_layers = match fs::create_dir_all(&dir) {
        Ok(()) => {
            let error_appender = RollingFileAppender::new(Rotation::DAILY, &dir, "classroom.log");
            let error_layer = fmt::layer()
                .with_writer(error_appender)
                .with_target(false)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_filter(EnvFilter::new("error"));

            // Structured logs for ingestion (Loki and similar).
            let json_appender = RollingFileAppender::new(Rotation::DAILY, &dir, "classroom.json");
            let json_layer = fmt::layer()
                .json()
                .with_writer(json_appender)
                .with_current_span(true)
                .with_span_list(true)
                .with_filter(EnvFilter::new("info"));

            Some(error_layer.and_then(json_layer))
        }
        Err(e) => {
            eprintln!(
                "Failed to create log directory {}: {}. File logging disabled",
                dir.display(),
                e
            );
            None
        }
    };

    let otel_layer = match std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") {
        Ok(endpoint) if !endpoint.trim().is_empty() => match init_tracer(endpoint) {
            Ok(tracer) => Some(tracing_opentelemetry::layer().with_tracer(tracer)),
            Err(e) => {
                eprintln!("Failed to initialize OpenTelemetry: {e}. Continuing without it");
                None
            }
        },
        _ => None,
    };
    let otel_enabled = otel_layer.is_some();

    let installed = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layers)
        .with(otel_layer)
        .try_init();

    match (installed, otel_enabled) {
        (Err(_), _) => {}
        (Ok(()), true) => info!("Tracing initialized with OpenTelemetry and file logging"),
        (Ok(()), false) => warn!("Tracing initialized without OpenTelemetry"),
    }
}

pub async fn shutdown_tracer() {
    info!("Shutting down OpenTelemetry tracer");
    global::shutdown_tracer_provider();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_default() {
        if std::env::var("LOG_DIR").is_err() {
            assert_eq!(log_dir(), PathBuf::from("storage/logs"));
        }
    }
}
