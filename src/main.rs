//! imgpress - Fetch, size-bound compress, and host images.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imgpress::{
    config::Config,
    gateway::{build_http_client, CloudinaryClient, HttpImageFetcher},
    server::{create_router, AppState, RouterConfig},
    SizeBoundCompressor,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    run_serve(config).await
}

async fn run_serve(config: Config) -> ExitCode {
    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("imgpress v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Cloudinary account: {}", config.cloud_name);
    info!("  Upload folder: {}", config.upload_folder);
    info!("  Size target: {}KB", config.target_kb);
    info!("  Outbound timeout: {}s", config.http_timeout);

    // One HTTP client shared by the fetch and upload gateways
    let http_client = match build_http_client(config.http_timeout) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let fetcher = HttpImageFetcher::new(http_client.clone());
    let cloudinary =
        CloudinaryClient::with_api_base(http_client, config.credentials(), &config.api_base);
    let compressor = SizeBoundCompressor::new(config.target_kb);

    // Verify provider reachability and credentials before taking traffic
    if config.skip_startup_ping {
        warn!("Skipping Cloudinary connectivity check (--skip-startup-ping)");
    } else {
        info!("Checking Cloudinary connectivity...");
        match cloudinary.ping().await {
            Ok(()) => {
                info!("  Connected successfully");
            }
            Err(e) => {
                error!("  Failed to reach Cloudinary: {}", e);
                error!("");
                error!("  Please check:");
                error!("    - CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET");
                error!("    - That the account '{}' exists", config.cloud_name);
                error!("    - Outbound network access to api.cloudinary.com");
                return ExitCode::FAILURE;
            }
        }
    }

    // Assemble state and router
    let state = AppState::new(fetcher, cloudinary, compressor, config.upload_folder.clone());
    let router_config = RouterConfig::new().with_tracing(!config.no_tracing);
    let router = create_router(state, router_config);

    // Bind and serve
    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/health", addr);
    info!(
        "    curl -X POST http://{}/compress-upload \\",
        addr
    );
    info!("         -H 'Content-Type: application/json' \\");
    info!("         -d '{{\"imageUrl\":\"https://example.com/photo.jpg\"}}'");
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "imgpress=debug,tower_http=debug"
    } else {
        "imgpress=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
