//! launchkit-api - LaunchKit HTTP API service
//!
//! Backend for the brand-launch project-management app: projects,
//! approval workflows, notifications, and the activity log.

use anyhow::Result;
use clap::Parser;
use launchkit_common::config;
use launchkit_common::db::init::init_database;
use launchkit_api::{build_router, AppState};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "launchkit-api", about = "LaunchKit API service")]
struct Args {
    /// Root data folder (holds launchkit.db)
    #[arg(long)]
    root_folder: Option<String>,

    /// HTTP listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting LaunchKit API (launchkit-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let file_config = config::FileConfig::load()?;
    let root_folder = config::resolve_root_folder(args.root_folder.as_deref(), &file_config);
    config::ensure_root_folder(&root_folder)?;

    let db_path = config::database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path).await?;

    let state = AppState::new(pool);
    let app = build_router(state);

    let host = config::resolve_bind_host(&file_config);
    let port = config::resolve_port(args.port, &file_config);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!("launchkit-api listening on http://{}:{}", host, port);
    info!("Health check: http://{}:{}/health", host, port);

    axum::serve(listener, app).await?;

    Ok(())
}
