//! Storage backends: save bytes under a name, hand back a servable URL.

mod local;
mod s3;

pub use local::LocalStorage;
pub use s3::S3Storage;

use crate::config::{Config, StorageConfig};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

// Both backends attach path/bucket context to failures, so raw I/O errors
// are always wrapped rather than carried as their own variant.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("upload failed: {0}")]
    UploadFailed(String),

    #[error("storage configuration error: {0}")]
    ConfigError(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A persisted media file: its final name within the backend namespace and
/// the URL the generated page will embed.
#[derive(Clone, Debug)]
pub struct StoredMedia {
    pub filename: String,
    pub url: String,
}

/// Save bytes under a name derived from the client-supplied filename.
///
/// Within one backend namespace no two stored objects share a filename: the
/// local backend checks for an existing file and suffixes on collision, the
/// S3 backend suffixes unconditionally.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn store(&self, original_filename: &str, data: Vec<u8>) -> StorageResult<StoredMedia>;
}

/// Build the one storage backend this deployment uses.
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match &config.storage {
        StorageConfig::Local => {
            let storage = LocalStorage::new(config.upload_dir.clone()).await?;
            Ok(Arc::new(storage))
        }
        StorageConfig::S3 {
            bucket,
            region,
            endpoint,
        } => {
            let storage = S3Storage::new(bucket.clone(), region.clone(), endpoint.clone()).await;
            Ok(Arc::new(storage))
        }
    }
}

/// Strip anything from a client-supplied filename that could not safely name
/// a file or object key. An all-invalid name falls back to a fixed default.
pub(crate) fn safe_filename(original: &str) -> String {
    let cleaned = sanitize_filename::sanitize(original);
    if cleaned.is_empty() {
        "video.mp4".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_filename_passes_ordinary_names() {
        assert_eq!(safe_filename("clip.mp4"), "clip.mp4");
    }

    #[test]
    fn safe_filename_strips_path_separators() {
        let cleaned = safe_filename("../../etc/passwd");
        assert!(!cleaned.contains('/'));
        assert!(!cleaned.contains('\\'));
    }

    #[test]
    fn safe_filename_rejects_bare_parent_reference() {
        assert_eq!(safe_filename(".."), "video.mp4");
    }

    #[test]
    fn safe_filename_falls_back_when_empty() {
        assert_eq!(safe_filename(""), "video.mp4");
    }
}
