use super::{safe_filename, Storage, StorageError, StorageResult, StoredMedia};
use crate::naming;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

/// S3 object storage. Credentials come from the standard AWS chain
/// (environment, profile, instance role) — never from configuration literals.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    region: String,
    /// Custom endpoint for S3-compatible providers (MinIO, Spaces, ...).
    endpoint: Option<String>,
}

impl S3Storage {
    pub async fn new(bucket: String, region: String, endpoint: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.clone()));
        if let Some(url) = &endpoint {
            loader = loader.endpoint_url(url.clone());
        }
        let shared = loader.load().await;
        let client = Client::new(&shared);

        S3Storage {
            client,
            bucket,
            region,
            endpoint,
        }
    }

    /// Public URL for an object key. Path-style for custom endpoints,
    /// virtual-hosted style for AWS proper.
    fn object_url(&self, key: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => {
                format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key)
            }
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn store(&self, original_filename: &str, data: Vec<u8>) -> StorageResult<StoredMedia> {
        // Unlike the local backend there is no existence check against the
        // bucket: every upload gets a suffix and the collision probability is
        // accepted as negligible.
        let desired = safe_filename(original_filename);
        let key = naming::suffixed(&desired, &naming::random_suffix(naming::MEDIA_SUFFIX_LEN));

        let size = data.len();
        let start = std::time::Instant::now();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        let url = self.object_url(&key);
        Ok(StoredMedia { filename: key, url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn object_url_uses_virtual_hosted_style_for_aws() {
        let storage = S3Storage::new(
            "my-bucket".to_string(),
            "us-east-1".to_string(),
            None,
        )
        .await;

        assert_eq!(
            storage.object_url("clip_Ab3x9Z.mp4"),
            "https://my-bucket.s3.us-east-1.amazonaws.com/clip_Ab3x9Z.mp4"
        );
    }

    #[tokio::test]
    async fn object_url_uses_path_style_for_custom_endpoint() {
        let storage = S3Storage::new(
            "my-bucket".to_string(),
            "us-east-1".to_string(),
            Some("http://localhost:9000/".to_string()),
        )
        .await;

        assert_eq!(
            storage.object_url("clip_Ab3x9Z.mp4"),
            "http://localhost:9000/my-bucket/clip_Ab3x9Z.mp4"
        );
    }
}
