mod error;
mod health;
mod index;
mod transcribe;

pub use error::{ApiError, ErrorResponse};
pub use health::health_handler;
pub use index::index_handler;
pub use transcribe::{TranscriptionResponse, transcribe_handler};
