use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Console-only logging, used when observability is disabled at build time
/// or through `OBSERVABILITY_ENABLED=false`.
///
/// `LOG_LEVEL` (default `info`) sets the level for the workspace crates;
/// `RUST_LOG` overrides the whole filter. Noisy dependencies stay at `warn`.
pub fn init_basic_console_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "classroom={level},classroom_core={level},classroom_db={level},\
             classroom_observability={level},classroom_cli={level},\
             tower_http=warn,hyper=warn,tonic=warn,h2=warn,sqlx=warn",
            level = log_level
        ))
    });

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(true)
        .with_filter(env_filter);

    // A subscriber may already be installed (tests, repeated init).
    if tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .is_ok()
    {
        eprintln!("Observability disabled - console logging only");
    }
}
