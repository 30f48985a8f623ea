mod cli;
mod error;
mod handlers;
mod models;
mod resources;
mod scanner;
mod utils;

use axum::{routing::get, Router};
use clap::Parser;
use cli::{Args, Command, ScanArgs};
use handlers::{finalizers, health, AppState};
use resources::dynamic::KubeCluster;
use std::process::ExitCode;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;
use utils::prompt::StdinConfirm;

fn init_logging(verbose: bool) {
    let default = if verbose {
        "k8s_finalizer_scanner=debug,tower_http=debug"
    } else {
        "k8s_finalizer_scanner=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries the report; diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/finalizers",
            get(finalizers::scan_finalizers).delete(finalizers::delete_finalizers),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn run_scan(args: &ScanArgs) -> error::Result<()> {
    let cluster = KubeCluster::try_default().await?;
    let report = scanner::get_pending_finalizers(
        &cluster,
        &StdinConfirm,
        &args.namespace_lists(),
        &args.filter_options()?,
        &args.scan_options(),
    )
    .await?;

    tracing::debug!(payload = %report.json, "Scan response");
    println!("{}", report.rendered);
    Ok(())
}

async fn serve(bind: &str) -> error::Result<()> {
    let cluster = KubeCluster::try_default().await?;
    let state = AppState {
        cluster: Arc::new(cluster),
    };

    let listener = tokio::net::TcpListener::bind(bind).await?;

    tracing::info!("Finalizer scanner listening on {}", listener.local_addr()?);
    tracing::info!("API endpoints:");
    tracing::info!("  Health: GET /health");
    tracing::info!("  Scan: GET /finalizers");
    tracing::info!("  Cleanup: DELETE /finalizers");

    axum::serve(listener, app(state)).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match &args.command {
        Some(Command::Serve { bind }) => serve(bind).await,
        Some(Command::Scan(scan)) => run_scan(scan).await,
        None => run_scan(&args.scan).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Finalizer scan failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
