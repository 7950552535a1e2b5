use once_cell::sync::OnceCell;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::TracerProvider;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Installs the global subscriber. Later calls are no-ops.
///
/// `json` switches the fmt layer to one JSON object per line, which is what
/// the log shipper expects in production. When `tracer` is given, spans are
/// also exported through it, named after their `otel.name` field.
pub fn init_logger(service_name: &str, json: bool, tracer: Option<&TracerProvider>) {
    LOGGER_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let otel = tracer.map(|provider| {
            tracing_opentelemetry::layer().with_tracer(provider.tracer("rate-service"))
        });

        let base = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true)
            // Includes timing when the span closes
            .with_span_events(fmt::format::FmtSpan::CLOSE);

        if json {
            tracing_subscriber::registry()
                .with(otel)
                .with(filter)
                .with(base.json())
                .init();
        } else {
            tracing_subscriber::registry()
                .with(otel)
                .with(filter)
                .with(base.pretty())
                .init();
        }

        tracing::info!(
            service = service_name,
            trace_export = tracer.is_some(),
            "logger initialized"
        );
    });
}
