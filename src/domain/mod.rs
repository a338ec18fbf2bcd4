mod extension_allow_list;
mod scratch_file_name;
mod segment;
mod upload_id;

pub use extension_allow_list::{DEFAULT_ALLOWED_EXTENSIONS, ExtensionAllowList, file_extension};
pub use scratch_file_name::ScratchFileName;
pub use segment::{Segment, TranscriptionInfo};
pub use upload_id::UploadId;
