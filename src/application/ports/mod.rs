mod scratch_store;
mod speech_model;

pub use scratch_store::{ScratchStore, StorageError, StoredFile};
pub use speech_model::{SegmentStream, SpeechModel, Transcription, TranscriptionError};
