mod init;
mod otel;
mod spans;
mod trace_id;

pub use init::init_logger;
pub use otel::init_tracer;
pub use spans::root_span;
pub use trace_id::TraceId;
