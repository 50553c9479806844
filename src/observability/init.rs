//! Tracing subscriber setup.

use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use std::sync::OnceLock;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Span file name inside the data directory.
pub const TRACE_FILE_NAME: &str = "modcatalog-spans.json";

static INITIALIZED: OnceLock<bool> = OnceLock::new();

/// Installs the global subscriber: env filter plus OTLP file export.
///
/// `RUST_LOG` wins over `config.trace_level`, which wins over `"info"`. Spans
/// go to [`TRACE_FILE_NAME`] under
/// [`data_dir`](crate::infrastructure::data_dir), rotated at 10 MiB with three
/// backups.
///
/// Observability is optional: if the directory cannot be created nothing is
/// installed. Only the first call has any effect; the return value says
/// whether tracing ended up active.
///
/// # Example
///
/// ```rust,no_run
/// use modcatalog::observability::init_tracing;
/// use modcatalog::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) -> bool {
    *INITIALIZED.get_or_init(|| install(config))
}

fn install(config: &Config) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.trace_level.as_deref().unwrap_or("info"))
    });

    let data_dir = crate::infrastructure::data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return false;
    }

    let resource = Resource::new(vec![
        opentelemetry::KeyValue::new("service.name", tracer::SCOPE),
        opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = tracer::create_tracer_provider(data_dir.join(TRACE_FILE_NAME), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(tracer::SCOPE));

    tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init()
        .is_ok()
}
