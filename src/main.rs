// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use axum::{extract::Request, ServiceExt};
use portal_server::{
    api::{app, default_exemptions},
    config::Config,
    state::AppState,
    storage::UserDatabase,
    telemetry,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Logging is not up yet.
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    telemetry::init(config.log_format);

    let db = match UserDatabase::open(&config.db_path) {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(path = %config.db_path.display(), error = %e, "Failed to open user database");
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(db, &config.auth, default_exemptions());

    let listener = match TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %config.bind_addr, error = %e, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        addr = %config.bind_addr,
        db = %config.db_path.display(),
        "Portal server listening (OpenAPI at /api-doc/openapi.json)"
    );

    let service = ServiceExt::<Request>::into_make_service(app(state));
    if let Err(e) = axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("Server stopped");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
