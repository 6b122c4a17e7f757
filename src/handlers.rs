use crate::models::{AppState, UploadForm};
use crate::{page, site};
use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        StatusCode,
    },
    response::{Html, Redirect},
};
use multer::{Constraints, Multipart, SizeLimit};
use std::sync::Arc;
use tracing::{error, info};

type ErrorPage = (StatusCode, Html<String>);

fn bad_request(message: &str) -> ErrorPage {
    (StatusCode::BAD_REQUEST, Html(site::render_error(message)))
}

fn payload_too_large(max_bytes: u64) -> ErrorPage {
    (
        StatusCode::PAYLOAD_TOO_LARGE,
        Html(site::render_error(&format!(
            "Upload too large. The limit is {} MB.",
            max_bytes / 1024 / 1024
        ))),
    )
}

fn server_error(message: &str) -> ErrorPage {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(site::render_error(message)),
    )
}

fn not_found_page() -> ErrorPage {
    (StatusCode::NOT_FOUND, Html(site::render_not_found()))
}

pub async fn home() -> Html<String> {
    Html(site::render_home())
}

pub async fn upload_form() -> Html<String> {
    Html(site::render_upload_form())
}

pub async fn tos() -> Html<String> {
    Html(site::render_tos())
}

pub async fn not_found() -> ErrorPage {
    not_found_page()
}

/// Serve the listing index document as-is. The read goes through the index
/// lock so it cannot interleave with a concurrent publish.
pub async fn videos(State(state): State<Arc<AppState>>) -> Result<Html<String>, ErrorPage> {
    match state.index.read().await {
        Ok(document) => Ok(Html(document)),
        Err(e) => {
            error!("failed to read listing index: {e}");
            Err(not_found_page())
        }
    }
}

/// Serve one generated video page.
pub async fn video_page(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Html<String>, ErrorPage> {
    match page::read_page(&state.config.page_dir, &name).await {
        Some(document) => Ok(Html(document)),
        None => Err(not_found_page()),
    }
}

/// Process an upload: persist the media, generate its page, publish the link.
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Result<Redirect, ErrorPage> {
    let form = parse_upload_form(request, &state).await?;

    let uploader = form.uploader.trim().to_string();
    let title = form.title.trim().to_string();
    if uploader.is_empty() {
        return Err(bad_request("Missing required field: name"));
    }
    if title.is_empty() {
        return Err(bad_request("Missing required field: videoName"));
    }
    let (original_filename, data) = form
        .file
        .ok_or_else(|| bad_request("Missing required field: video"))?;

    // Persist the media first. A storage failure aborts here: no page is
    // written and the index is untouched.
    let stored = state
        .storage
        .store(&original_filename, data)
        .await
        .map_err(|e| {
            error!("failed to store upload {original_filename:?}: {e}");
            server_error("Error uploading file")
        })?;

    let html_filename = page::page_filename();
    let document = page::render_video_page(&title, &uploader, &form.description, &stored.url);
    page::write_page(&state.config.page_dir, &html_filename, &document)
        .await
        .map_err(|e| {
            error!("failed to write video page {html_filename}: {e}");
            server_error("Error saving video page")
        })?;

    // Index update failures are logged and swallowed: the page exists and is
    // reachable by URL, it just is not listed yet.
    if let Err(e) = state.index.publish(&html_filename, &title).await {
        error!("failed to update listing index: {e}");
    }

    info!(
        file = %stored.filename,
        page = %html_filename,
        title = %title,
        "video published"
    );

    Ok(Redirect::to("/videos"))
}

/// Slack allowed on top of the media cap for boundaries and text fields.
const FORM_OVERHEAD: u64 = 64 * 1024;

/// Parse the multipart POST body into an [`UploadForm`].
///
/// Fields: `name`, `videoName`, `description` (optional), `video` (file).
async fn parse_upload_form(
    request: Request<Body>,
    state: &AppState,
) -> Result<UploadForm, ErrorPage> {
    let max_bytes = state.config.max_upload_size;

    // Transport-boundary cap: a declared Content-Length over the limit is
    // rejected before any of the body is read. Chunked uploads without a
    // declared length are bounded by the stream limit below instead.
    if let Some(declared) = request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
    {
        if declared > max_bytes + FORM_OVERHEAD {
            return Err(payload_too_large(max_bytes));
        }
    }

    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| bad_request("Missing Content-Type header"))?;

    let boundary = multer::parse_boundary(content_type)
        .map_err(|e| bad_request(&format!("Invalid multipart request: {e}")))?;

    // The body is consumed as a stream; multer enforces the limits chunk by
    // chunk, so an oversized upload is cut off instead of buffered whole.
    let constraints = Constraints::new().size_limit(
        SizeLimit::new()
            .whole_stream(max_bytes + FORM_OVERHEAD)
            .per_field(max_bytes),
    );
    let stream = request.into_body().into_data_stream();
    let mut multipart = Multipart::with_constraints(stream, boundary, constraints);

    let mut form = UploadForm::default();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "name" => {
                form.uploader = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, max_bytes))?;
            }
            "videoName" => {
                form.title = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, max_bytes))?;
            }
            "description" => {
                form.description = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, max_bytes))?;
            }
            "video" => {
                // A form submitted with no file selected arrives as a part
                // with an empty filename; that counts as a missing field.
                let file_name = field.file_name().unwrap_or("").to_string();
                if file_name.is_empty() {
                    continue;
                }

                let mut data = Vec::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| multipart_error(e, max_bytes))?
                {
                    data.extend_from_slice(&chunk);
                    if data.len() as u64 > max_bytes {
                        error!(
                            "upload rejected: {} bytes exceeds the {} byte cap",
                            data.len(),
                            max_bytes
                        );
                        return Err(payload_too_large(max_bytes));
                    }
                }

                form.file = Some((file_name, data));
            }
            _ => {
                // Drain and ignore unknown fields.
                while field
                    .chunk()
                    .await
                    .map_err(|e| multipart_error(e, max_bytes))?
                    .is_some()
                {}
            }
        }
    }

    Ok(form)
}

fn multipart_error(e: multer::Error, max_bytes: u64) -> ErrorPage {
    match e {
        multer::Error::FieldSizeExceeded { .. } | multer::Error::StreamSizeExceeded { .. } => {
            payload_too_large(max_bytes)
        }
        other => {
            error!("multipart parsing error: {other}");
            bad_request(&format!("Error parsing multipart request: {other}"))
        }
    }
}
