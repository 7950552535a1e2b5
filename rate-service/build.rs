//! Generates the `rate.RateService` gRPC glue.
//!
//! Message types are hand-written prost structs in `src/server/proto.rs`, so
//! only the service/client stubs are generated and no `protoc` is required.

use tonic_build::manual::{Builder, Method, Service};

fn unary(name: &str, route: &str, output: &str) -> Method {
    Method::builder()
        .name(name)
        .route_name(route)
        .input_type("crate::server::proto::Empty")
        .output_type(output)
        .codec_path("tonic::codec::ProstCodec")
        .build()
}

fn main() {
    let service = Service::builder()
        .name("RateService")
        .package("rate")
        .method(unary(
            "get_rates",
            "GetRates",
            "crate::server::proto::RateResponse",
        ))
        .method(unary(
            "health_check",
            "HealthCheck",
            "crate::server::proto::HealthResponse",
        ))
        .build();

    Builder::new().compile(&[service]);
}
