use serde::Deserialize;
use std::path::PathBuf;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub port: Option<u16>,
    pub page_dir: Option<String>,
    pub upload_dir: Option<String>,
    pub max_upload_size: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub backend: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub server: ServerSection,
    pub storage: StorageSection,
}

/// Which storage backend is active for this deployment. Exactly one is ever
/// constructed; the variants are alternate deployments, not parallel paths.
///
/// S3 credentials are never part of this struct: they come from the standard
/// AWS environment/profile chain at client construction time.
#[derive(Clone, Debug)]
pub enum StorageConfig {
    Local,
    S3 {
        bucket: String,
        region: String,
        endpoint: Option<String>,
    },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    /// Directory holding generated video pages plus the listing index.
    pub page_dir: PathBuf,
    /// Directory holding stored media files (local backend).
    pub upload_dir: PathBuf,
    pub max_upload_size: u64,
    pub storage: StorageConfig,
}

const DEFAULT_PORT: u16 = 5001;
const DEFAULT_MAX_UPLOAD_SIZE: u64 = 25 * 1024 * 1024;

impl Config {
    /// Load configuration: env vars override config.toml, defaults last.
    pub fn load() -> anyhow::Result<Self> {
        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        let config_path = base_dir.join("config.toml");
        let config_file = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Some(toml::from_str::<ConfigFile>(&content)?)
        } else {
            None
        };

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .or_else(|| config_file.as_ref().and_then(|c| c.server.port))
            .unwrap_or(DEFAULT_PORT);

        let page_dir_str = std::env::var("PAGE_DIR")
            .ok()
            .or_else(|| config_file.as_ref().and_then(|c| c.server.page_dir.clone()))
            .unwrap_or_else(|| "pages".to_string());

        let upload_dir_str = std::env::var("UPLOAD_DIR")
            .ok()
            .or_else(|| config_file.as_ref().and_then(|c| c.server.upload_dir.clone()))
            .unwrap_or_else(|| "uploads".to_string());

        let max_upload_size = std::env::var("MAX_UPLOAD_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or_else(|| config_file.as_ref().and_then(|c| c.server.max_upload_size))
            .unwrap_or(DEFAULT_MAX_UPLOAD_SIZE);

        let backend = std::env::var("STORAGE_BACKEND")
            .ok()
            .or_else(|| config_file.as_ref().and_then(|c| c.storage.backend.clone()))
            .unwrap_or_else(|| "local".to_string());

        let storage = match backend.as_str() {
            "local" => StorageConfig::Local,
            "s3" => {
                let bucket = std::env::var("S3_BUCKET")
                    .ok()
                    .or_else(|| config_file.as_ref().and_then(|c| c.storage.s3_bucket.clone()))
                    .ok_or_else(|| anyhow::anyhow!("s3 backend selected but S3_BUCKET not set"))?;
                let region = std::env::var("S3_REGION")
                    .ok()
                    .or_else(|| config_file.as_ref().and_then(|c| c.storage.s3_region.clone()))
                    .ok_or_else(|| anyhow::anyhow!("s3 backend selected but S3_REGION not set"))?;
                let endpoint = std::env::var("S3_ENDPOINT")
                    .ok()
                    .or_else(|| config_file.as_ref().and_then(|c| c.storage.s3_endpoint.clone()));
                StorageConfig::S3 {
                    bucket,
                    region,
                    endpoint,
                }
            }
            other => {
                anyhow::bail!("unknown storage backend {other:?} (expected \"local\" or \"s3\")")
            }
        };

        Ok(Self {
            port,
            page_dir: resolve_dir(&base_dir, &page_dir_str),
            upload_dir: resolve_dir(&base_dir, &upload_dir_str),
            max_upload_size,
            storage,
        })
    }
}

fn resolve_dir(base_dir: &std::path::Path, dir: &str) -> PathBuf {
    if dir.starts_with('/') {
        PathBuf::from(dir)
    } else {
        base_dir.join(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_sections_are_optional() {
        let parsed: ConfigFile = toml::from_str("").unwrap();
        assert!(parsed.server.port.is_none());
        assert!(parsed.storage.backend.is_none());
    }

    #[test]
    fn config_file_parses_partial_sections() {
        let parsed: ConfigFile = toml::from_str(
            r#"
            [server]
            port = 8080

            [storage]
            backend = "s3"
            s3_bucket = "my-bucket"
            s3_region = "us-east-1"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.server.port, Some(8080));
        assert_eq!(parsed.storage.backend.as_deref(), Some("s3"));
        assert!(parsed.storage.s3_endpoint.is_none());
    }
}
