use crate::config::Config;
use crate::listing::ListingIndex;
use crate::storage::Storage;
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub index: ListingIndex,
}

/// Collected multipart fields of one upload request. Transient: only its
/// derived artifacts (stored media, generated page, index entry) persist.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub uploader: String,
    pub title: String,
    pub description: String,
    /// Original filename plus the raw bytes of the `video` part.
    pub file: Option<(String, Vec<u8>)>,
}
