//! Generated video pages: one static HTML document per upload.

use crate::naming;
use htmlescape::encode_minimal;
use std::path::Path;
use tokio::fs;

/// Fixed marker prefixing every generated page filename.
pub const PAGE_MARKER: &str = "Mt";

/// Pick a filename for a new video page: `Mt-<8 random alphanumeric>.html`.
///
/// No collision check; the 62^8 space is treated as collision-free.
pub fn page_filename() -> String {
    format!(
        "{}-{}.html",
        PAGE_MARKER,
        naming::random_suffix(naming::PAGE_SUFFIX_LEN)
    )
}

/// Render the self-contained page for one uploaded video.
///
/// Every user-supplied field is entity-encoded before interpolation, so a
/// hostile title or description cannot inject markup into the page. The media
/// URL is server-generated.
pub fn render_video_page(title: &str, uploader: &str, description: &str, media_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} - MyTube</title>
    <link href="/static/style.css" rel="stylesheet" type="text/css">
</head>
<body>
    <h1>MyTube</h1>
    <video src="{media_url}" controls></video>
    <h2>{title}</h2>
    <p>Uploader: {uploader}</p>
    <p>Description: {description}</p>
</body>
</html>
"#,
        title = encode_minimal(title),
        uploader = encode_minimal(uploader),
        description = encode_minimal(description),
        media_url = media_url,
    )
}

/// Persist a generated page into the page store.
pub async fn write_page(page_dir: &Path, filename: &str, html: &str) -> std::io::Result<()> {
    fs::write(page_dir.join(filename), html).await
}

/// Read a generated page back for serving. Returns `None` for names that are
/// missing or that try to reach outside the page store.
pub async fn read_page(page_dir: &Path, name: &str) -> Option<String> {
    if !is_safe_page_name(name) {
        return None;
    }
    fs::read_to_string(page_dir.join(name)).await.ok()
}

/// A servable page name: no separators, no parent references, `.html` suffix.
fn is_safe_page_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
        && name.ends_with(".html")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn page_filename_has_marker_and_eight_char_suffix() {
        let name = page_filename();
        assert!(name.starts_with("Mt-"));
        assert!(name.ends_with(".html"));
        let suffix = &name["Mt-".len()..name.len() - ".html".len()];
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn rendered_page_embeds_metadata_and_media_url() {
        let html = render_video_page("Cats", "Ann", "my cat video", "/uploads/clip.mp4");
        assert!(html.contains(r#"<video src="/uploads/clip.mp4" controls></video>"#));
        assert!(html.contains("<h2>Cats</h2>"));
        assert!(html.contains("Uploader: Ann"));
        assert!(html.contains("Description: my cat video"));
        assert!(html.contains("/static/style.css"));
    }

    #[test]
    fn rendered_page_encodes_user_supplied_markup() {
        let html = render_video_page(
            "<script>alert(1)</script>",
            "Ann & Bob",
            "<img src=x>",
            "/uploads/clip.mp4",
        );
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Ann &amp; Bob"));
        assert!(!html.contains("<img"));
    }

    #[tokio::test]
    async fn page_store_round_trips() {
        let dir = tempdir().unwrap();
        let name = page_filename();
        write_page(dir.path(), &name, "<html>page</html>").await.unwrap();

        let read = read_page(dir.path(), &name).await.unwrap();
        assert_eq!(read, "<html>page</html>");
    }

    #[tokio::test]
    async fn read_page_rejects_traversal_names() {
        let dir = tempdir().unwrap();
        assert!(read_page(dir.path(), "../secret.html").await.is_none());
        assert!(read_page(dir.path(), "/etc/passwd").await.is_none());
        assert!(read_page(dir.path(), "page.txt").await.is_none());
    }

    #[tokio::test]
    async fn read_page_returns_none_for_missing_page() {
        let dir = tempdir().unwrap();
        assert!(read_page(dir.path(), "Mt-missing0.html").await.is_none());
    }
}
