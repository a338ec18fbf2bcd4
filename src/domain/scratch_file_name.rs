use std::fmt;

use super::upload_id::UploadId;

/// On-disk name of a request-scoped upload: `<uuid>.<extension>`.
///
/// Only the extension of the client filename survives; its stem and any
/// path components are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchFileName(String);

impl ScratchFileName {
    pub fn new(upload_id: &UploadId, extension: &str) -> Self {
        let id = upload_id.as_uuid().hyphenated();
        if extension.is_empty() {
            Self(id.to_string())
        } else {
            Self(format!("{}.{}", id, extension))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScratchFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
