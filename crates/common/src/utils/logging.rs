use std::io;
use tracing_subscriber::{fmt, EnvFilter};

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialize the tracing subscriber with a compact stdout format.
///
/// `RUST_LOG` wins when set; the fallback keeps http-layer noise at info and
/// silences per-statement query logs.
pub fn init_logging_default() {
    let _ = fmt()
        .with_env_filter(filter("info,tower_http=info,axum=info,sea_orm=warn"))
        .with_target(false)
        .compact()
        .with_writer(|| io::stdout())
        .try_init();
}

/// Initialize the tracing subscriber with JSON structured output, for
/// container environments that ship stdout to a log collector.
pub fn init_logging_json() {
    let _ = fmt()
        .with_env_filter(filter("info"))
        .with_target(false)
        .json()
        .with_writer(|| io::stdout())
        .try_init();
}
