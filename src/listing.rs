//! The shared listing document: every published video gets a link prepended
//! inside a fixed container element of `videos.html`.

use htmlescape::encode_minimal;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;

/// Filename of the listing index inside the page dir.
pub const INDEX_FILENAME: &str = "videos.html";

/// Opening tag the new link is inserted after. Literal contract between this
/// module and the seed document in `site.rs`.
pub const CONTAINER_TAG: &str = r#"<div class="videos">"#;

/// Hand-rolled append-only index over a single HTML file.
///
/// The whole read-modify-write cycle runs under one mutex, so two overlapping
/// uploads cannot drop each other's link.
pub struct ListingIndex {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ListingIndex {
    pub fn new(path: PathBuf) -> Self {
        ListingIndex {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read the whole index under the same lock `publish` holds, so a reader
    /// can never observe a half-written document.
    pub async fn read(&self) -> std::io::Result<String> {
        let _guard = self.lock.lock().await;
        fs::read_to_string(&self.path).await
    }

    /// Insert a link to a freshly generated page as the first child of the
    /// container, so the listing reads newest-first.
    ///
    /// When the container tag is absent the document is written back
    /// unchanged; that is not an error.
    pub async fn publish(&self, page_filename: &str, title: &str) -> std::io::Result<()> {
        let _guard = self.lock.lock().await;

        let document = fs::read_to_string(&self.path).await?;

        let anchor = format!(
            "<a href=\"/video/{}\">{}</a><br>\n",
            page_filename,
            encode_minimal(title)
        );
        let updated = document.replacen(
            CONTAINER_TAG,
            &format!("{CONTAINER_TAG}\n    {anchor}"),
            1,
        );

        fs::write(&self.path, updated).await?;

        tracing::info!(page = %page_filename, title = %title, "published to listing index");
        Ok(())
    }
}
