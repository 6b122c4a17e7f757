use super::{safe_filename, Storage, StorageError, StorageResult, StoredMedia};
use crate::naming;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage: files land in the upload directory and are
/// served back under `/uploads/<filename>` by the web front.
#[derive(Clone)]
pub struct LocalStorage {
    upload_dir: PathBuf,
}

impl LocalStorage {
    pub async fn new(upload_dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let upload_dir = upload_dir.into();

        fs::create_dir_all(&upload_dir).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "failed to create upload directory {}: {}",
                upload_dir.display(),
                e
            ))
        })?;

        Ok(LocalStorage { upload_dir })
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store(&self, original_filename: &str, data: Vec<u8>) -> StorageResult<StoredMedia> {
        let desired = safe_filename(original_filename);

        // Never overwrite an existing upload: a name collision gets a random
        // suffix instead. A second collision on the suffixed name is not
        // handled; the 62^6 suffix space makes it negligible.
        let exists = fs::try_exists(self.upload_dir.join(&desired))
            .await
            .unwrap_or(false);
        let filename = if exists {
            naming::suffixed(&desired, &naming::random_suffix(naming::MEDIA_SUFFIX_LEN))
        } else {
            desired
        };

        let path = self.upload_dir.join(&filename);
        let size = data.len();
        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("failed to create {}: {}", path.display(), e))
        })?;
        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("failed to write {}: {}", path.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("failed to sync {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "local storage upload successful"
        );

        let url = format!("/uploads/{filename}");
        Ok(StoredMedia { filename, url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn store_keeps_original_name_when_free() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let stored = storage.store("clip.mp4", b"0123456789".to_vec()).await.unwrap();

        assert_eq!(stored.filename, "clip.mp4");
        assert_eq!(stored.url, "/uploads/clip.mp4");
        assert_eq!(fs::read(dir.path().join("clip.mp4")).await.unwrap(), b"0123456789");
    }

    #[tokio::test]
    async fn store_never_overwrites_existing_upload() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let first = storage.store("clip.mp4", b"first bytes".to_vec()).await.unwrap();
        let second = storage.store("clip.mp4", b"second bytes".to_vec()).await.unwrap();

        assert_ne!(first.filename, second.filename);
        // The second upload carries a 6-char alphanumeric suffix before the extension.
        assert!(second.filename.starts_with("clip_"));
        assert!(second.filename.ends_with(".mp4"));
        let suffix = &second.filename["clip_".len()..second.filename.len() - ".mp4".len()];
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));

        // Both files co-exist and the first one's bytes are untouched.
        assert_eq!(
            fs::read(dir.path().join(&first.filename)).await.unwrap(),
            b"first bytes"
        );
        assert_eq!(
            fs::read(dir.path().join(&second.filename)).await.unwrap(),
            b"second bytes"
        );
    }

    #[tokio::test]
    async fn store_sanitizes_hostile_filenames() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let stored = storage
            .store("../../escape.mp4", b"data".to_vec())
            .await
            .unwrap();

        assert!(!stored.filename.contains('/'));
        assert!(!stored.filename.contains('\\'));
        assert!(fs::try_exists(dir.path().join(&stored.filename)).await.unwrap());
    }
}
