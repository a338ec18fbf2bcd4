use std::sync::Arc;

use crate::application::services::UploadService;

#[derive(Clone)]
pub struct AppState {
    pub upload_service: Arc<UploadService>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(upload_service: Arc<UploadService>, max_upload_bytes: usize) -> Self {
        Self {
            upload_service,
            max_upload_bytes,
        }
    }
}
