use backend_lib::{config::Settings, router, store::FlatFileStore, AppState};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Authgate token service
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the configuration file
    #[arg(long, default_value = "config/default.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Config can sit next to the binary or at the workspace root
    let settings = Settings::load_from(&args.config)
        .or_else(|_| Settings::load_from("./config/default.toml"))
        .or_else(|_| Settings::load())?;

    // Initialize tracing; RUST_LOG overrides the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone())),
        )
        .init();

    // Create storage
    let storage = FlatFileStore::open(&settings.storage.path).await?;

    // Create application state
    let state = Arc::new(AppState::new(storage, &settings)?);

    let app = router::create_router(state);

    // Start the server
    let addr = settings.bind_addr()?;
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
