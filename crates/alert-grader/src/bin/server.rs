//! Grader server binary
//!
//! Run with: cargo run -p alert-grader --bin alert-grader-server

use alert_grader::{config::GraderConfig, server::GraderServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GraderConfig::from_env()?;

    // Initialize tracing
    let default_filter = if config.server.debug {
        "alert_grader=debug,tower_http=debug"
    } else {
        "alert_grader=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Configuration loaded");
    tracing::info!("  - Store backend: {:?}", config.storage.backend);
    tracing::info!("  - Input namespace: {}", config.storage.input_namespace);
    tracing::info!("  - Output namespace: {}", config.storage.output_namespace);
    tracing::info!("  - Max upload: {} bytes", config.upload.max_file_size);
    tracing::info!(
        "  - Simulated results: {} ({:?})",
        config.processing.simulate_results,
        config.processing.result_delay
    );
    tracing::info!("  - Listings enabled: {}", config.server.enable_listings);

    let server = GraderServer::new(config).await?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/api/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/upload          - Upload a file (multipart field 'file')");
    println!("  GET  /api/result/:job_id  - Poll for the result");
    println!("  GET  /api/status/:job_id  - Explicit job state");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
