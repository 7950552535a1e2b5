pub mod api;
pub mod client;
pub mod errors;

pub use api::DepthSource;
pub use client::{DEFAULT_DEPTH_URL, GrinexClient};
pub use errors::FetchError;
