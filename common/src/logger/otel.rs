use opentelemetry::KeyValue;
use opentelemetry::trace::TraceError;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::{Resource, runtime};

/// Builds the OTLP/gRPC span exporter and a batching provider for it.
///
/// Must run inside a tokio runtime; the batch processor is spawned onto it.
/// `TracerProvider::shutdown` blocks until the queue is flushed, so callers
/// run it on a blocking thread.
pub fn init_tracer(service_name: &str, endpoint: &str) -> Result<TracerProvider, TraceError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(collector_url(endpoint))
        .build()?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            service_name.to_string(),
        )]))
        .build();

    Ok(provider)
}

/// Collector endpoints are usually configured as `host:port`; tonic needs a scheme.
pub(crate) fn collector_url(endpoint: &str) -> String {
    if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    }
}
