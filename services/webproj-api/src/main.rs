//! webproj API Server
//!
//! Transforms coordinates between Danish, Greenlandic and global CRS's.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use transformation::{Engine, ProjEngine};
use webproj_api::config::ServiceConfig;
use webproj_api::state::AppState;
use webproj_common::CrsCatalog;

/// webproj API Server
#[derive(Parser, Debug)]
#[command(name = "webproj-api")]
#[command(about = "Coordinate transformation service for DK, GL and global CRS's")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080", env = "WEBPROJ_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "WEBPROJ_WORKER_THREADS")]
    worker_threads: Option<usize>,

    /// CRS catalog JSON file (built-in catalog if not set)
    #[arg(long, env = "WEBPROJ_CATALOG")]
    catalog: Option<PathBuf>,

    /// Extra directory searched for PROJ init files and grids
    #[arg(long, env = "WEBPROJ_LIB")]
    proj_data_dir: Option<PathBuf>,

    /// Service config YAML file
    #[arg(short, long, env = "WEBPROJ_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    // Initialize Prometheus metrics exporter
    let prometheus = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!(proj_version = %ProjEngine::version(), "Starting webproj API server");

    let catalog = match &args.catalog {
        Some(path) => CrsCatalog::from_file(path)?,
        None => CrsCatalog::builtin()?,
    };
    info!(entries = catalog.len(), "Loaded CRS catalog");

    let config = match &args.config {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::default(),
    };

    let engine: Arc<dyn Engine> = match &args.proj_data_dir {
        Some(dir) => Arc::new(ProjEngine::with_data_dir(dir)?),
        None => Arc::new(ProjEngine::new()),
    };

    let state = AppState::new(engine, Arc::new(catalog), &config, prometheus);
    state.prewarm(&config);

    let app = webproj_api::build_router(Arc::new(state));

    // Parse listen address
    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!("webproj API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
