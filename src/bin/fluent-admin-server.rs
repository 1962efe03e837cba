// ABOUTME: HTTP server binary for the Fluent Life admin API
// ABOUTME: Loads configuration, opens the database and serves the admin routes until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

//! # Fluent Admin API Server Binary
//!
//! Starts the admin back-office API. Configuration comes from environment
//! variables; `--http-port` overrides `HTTP_PORT`.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use fluent_admin_api::{config::ServerConfig, database::Database, logging, routes::build_router};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "fluent-admin-server")]
#[command(about = "Fluent Life admin API - back-office management for training content")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config =
        ServerConfig::from_env().inspect_err(|e| error!("Invalid configuration: {e:#}"))?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    info!("Starting Fluent Life admin API");
    info!("{}", config.summary());

    let database = Database::new(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    info!("Database initialized: {}", config.database_url);

    match database.import_legacy_ai_roles().await {
        Ok(0) => {}
        Ok(imported) => info!(imported, "Migrated AI roles from app settings"),
        Err(e) => warn!(error = %e, "Skipping legacy AI role import"),
    }

    let router = build_router(Arc::new(database), &config)?;

    let address = format!("0.0.0.0:{}", config.http_port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Admin API listening on {address}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Admin API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
