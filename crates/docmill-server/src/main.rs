// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Docmill — document conversion service.
//
// Entry point. Initialises logging, loads the configuration and serves the
// HTTP router until interrupted.

use std::process::ExitCode;

use docmill_core::{DocmillError, ServiceConfig};
use docmill_document::DocumentConverter;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "Docmill stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), DocmillError> {
    let config = ServiceConfig::from_env()?;
    config.validate()?;

    let converter = DocumentConverter::new(&config);
    let address = config.listen_address();
    let listener = TcpListener::bind(&address).await?;
    info!(%address, paper_size = ?config.paper_size, "Docmill listening");

    axum::serve(listener, docmill_server::app(converter, &config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Docmill shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(%err, "Cannot listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
}
