pub mod config;
pub mod handlers;
pub mod listing;
pub mod models;
pub mod naming;
pub mod page;
pub mod site;
pub mod storage;

use axum::{routing::get, Router};
use config::{Config, StorageConfig};
use listing::ListingIndex;
use models::AppState;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

/// Prepare the on-disk layout and the storage backend for a configuration.
///
/// The listing index is seeded only when absent, so an existing deployment's
/// index survives restarts untouched.
pub async fn bootstrap(config: Config) -> anyhow::Result<Arc<AppState>> {
    tokio::fs::create_dir_all(&config.page_dir).await?;

    let index_path = config.page_dir.join(listing::INDEX_FILENAME);
    if !tokio::fs::try_exists(&index_path).await.unwrap_or(false) {
        tokio::fs::write(&index_path, site::INDEX_SEED).await?;
        info!(path = %index_path.display(), "seeded listing index");
    }

    let storage = storage::create_storage(&config).await?;

    Ok(Arc::new(AppState {
        index: ListingIndex::new(index_path),
        storage,
        config,
    }))
}

/// Build the full route table over an application state.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::home))
        .route(
            "/upload-video",
            get(handlers::upload_form).post(handlers::upload_video),
        )
        .route("/videos", get(handlers::videos))
        .route("/video/:name", get(handlers::video_page))
        .route("/tos", get(handlers::tos));

    // Stored media is only served by this process for the local backend; the
    // S3 variant embeds bucket URLs instead.
    if matches!(state.config.storage, StorageConfig::Local) {
        app = app.nest_service("/uploads", ServeDir::new(&state.config.upload_dir));
    }

    app.nest_service("/static", ServeDir::new("static"))
        .fallback(handlers::not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
