use mytube::config::{Config, StorageConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("mytube=debug,tower_http=debug")
        .init();

    // Load configuration
    let config = Config::load()?;

    let state = mytube::bootstrap(config.clone()).await?;
    let app = mytube::router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    info!("🚀 Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("{}", "=".repeat(60));
    println!("✅ MyTube running on http://0.0.0.0:{}", config.port);
    println!("✅ Server accessible at http://localhost:{}", config.port);
    println!("{}", "=".repeat(60));
    println!(
        "   Storage: {}",
        match &config.storage {
            StorageConfig::Local => format!("local ({})", config.upload_dir.display()),
            StorageConfig::S3 { bucket, region, .. } => format!("s3 ({bucket} in {region})"),
        }
    );
    println!("   Page Dir: {:?}", config.page_dir);
    println!("   Max Upload: {} MB", config.max_upload_size / 1024 / 1024);
    println!("{}", "=".repeat(60));

    info!("✅ Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
