// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use clap::Parser;
use std::{net::SocketAddr, sync::Arc};

use crate::application::chart_service::ChartService;
use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::config::load_config;
use crate::infrastructure::influx_repository::InfluxRepository;
use crate::infrastructure::logging::init_tracing;
use crate::infrastructure::templates::PageTemplates;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[derive(Parser, Debug)]
#[command(name = "energy-dashboard", about = "Battery and power dashboard for energy telemetry")]
struct Args {
    /// Enable debug level logging
    #[arg(long)]
    debug: bool,

    /// Human-readable log output on stderr instead of JSON on stdout
    #[arg(long)]
    console: bool,

    /// Configuration file, without extension
    #[arg(long, default_value = "config/dashboard")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    init_tracing(args.debug, args.console);

    // Load configuration
    let config = load_config(&args.config)?;
    tracing::debug!(server = ?config.server, "configuration loaded");

    let templates = Arc::new(PageTemplates::load(&config.server.templates_dir)?);

    // Create repository (infrastructure layer)
    let repository = Arc::new(InfluxRepository::new(config.influx));

    // Create services (application layer)
    let dashboard_service = DashboardService::new(repository.clone(), config.server.history_hours);
    let chart_service = ChartService::new(repository, templates.clone());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid listen address")?;

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service,
        chart_service,
        templates,
        settings: config.server,
    });

    let router = build_router(state);

    tracing::info!(%addr, "starting energy-dashboard");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, router).await?;

    Ok(())
}
