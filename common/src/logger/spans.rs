use tracing::{Span, field};

use super::TraceId;

/// Root span for one inbound call.
///
/// `error` starts empty and is recorded when the call fails.
pub fn root_span(name: &'static str, service: &str, trace_id: &TraceId) -> Span {
    tracing::info_span!(
        "rpc",
        otel.name = name,
        service = %service,
        trace_id = %trace_id,
        error = field::Empty
    )
}

