//! Static site pages. Generated video pages live in `page.rs`; everything the
//! server renders without upload metadata lives here.

use htmlescape::encode_minimal;

/// Initial content of the listing index, written at bootstrap when the page
/// dir does not yet contain one. `listing::CONTAINER_TAG` must match the
/// container element here.
pub const INDEX_SEED: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Videos - MyTube</title>
    <link href="/static/style.css" rel="stylesheet" type="text/css">
</head>
<body>
    <h1>MyTube</h1>
    <h2>All videos</h2>
    <div class="videos">
    </div>
    <p><a href="/upload-video">Upload a video</a> · <a href="/">Home</a></p>
</body>
</html>
"#;

fn shell(title: &str, body: &str) -> String {
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
{body}
</body>
</html>
"#
    )
}

pub fn render_home() -> String {
    shell(
        "Home",
        r#"    <p>Share a video with the world. No accounts, no fuss.</p>
    <ul>
        <li><a href="/upload-video">Upload a video</a></li>
        <li><a href="/videos">Browse videos</a></li>
        <li><a href="/tos">Terms of service</a></li>
    </ul>"#,
    )
}

pub fn render_upload_form() -> String {
    shell(
        "Upload",
        r#"    <h2>Upload a video</h2>
    <form method="post" enctype="multipart/form-data" action="/upload-video">
        <label>Your name</label>
        <input type="text" name="name" required>
        <label>Video title</label>
        <input type="text" name="videoName" required>
        <label>Description (optional)</label>
        <textarea name="description"></textarea>
        <label>Video file</label>
        <input type="file" name="video" accept="video/*" required>
        <button type="submit">Upload</button>
    </form>"#,
    )
}

pub fn render_tos() -> String {
    shell(
        "Terms of Service",
        r#"    <h2>Terms of service</h2>
    <p>Uploads are published as-is and never deleted by this service.
    Do not upload anything you do not have the right to share.</p>"#,
    )
}

pub fn render_not_found() -> String {
    shell(
        "Not Found",
        r#"    <h2>404 - Page not found</h2>
    <p>That page does not exist. <a href="/">Back to the home page.</a></p>"#,
    )
}

/// Error page shown for failed uploads. The message may echo client input,
/// so it is entity-encoded.
pub fn render_error(message: &str) -> String {
    let message = encode_minimal(message);
    shell(
        "Error",
        &format!(
            r#"    <h2>Something went wrong</h2>
    <p>{message}</p>
    <p><a href="/upload-video">Back to the upload form.</a></p>"#
        ),
    )
}
