mod init_tracing;
mod request_span;
mod tracing_config;

pub use init_tracing::init_tracing;
pub use request_span::{REQUEST_ID_HEADER, make_request_span};
pub use tracing_config::TracingConfig;
