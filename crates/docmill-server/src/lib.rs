// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docmill-server — HTTP front-end for the Docmill conversions.
//
// Exposes the five multipart conversion routes and a health check. The
// router is built by `app()` so tests can drive it without a socket.

pub mod error;
pub mod handlers;
pub mod response;
pub mod scratch;
pub mod upload;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use chrono::{DateTime, Utc};
use docmill_core::ServiceConfig;
use docmill_document::DocumentConverter;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::AppError;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    converter: Arc<DocumentConverter>,
    scratch_dir: Option<PathBuf>,
    started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(converter: DocumentConverter, config: &ServiceConfig) -> Self {
        Self {
            converter: Arc::new(converter),
            scratch_dir: config.temp_dir.clone(),
            started_at: Utc::now(),
        }
    }
}

/// Build the application router with all routes configured.
pub fn app(converter: DocumentConverter, config: &ServiceConfig) -> Router {
    let state = AppState::new(converter, config);

    Router::new()
        .route("/convert-jpg-to-pdf", post(handlers::convert_jpg_to_pdf))
        .route("/merge-jpg-to-pdf", post(handlers::merge_jpg_to_pdf))
        .route("/merge-pdf", post(handlers::merge_pdf))
        .route("/convert-pdf-to-word", post(handlers::convert_pdf_to_word))
        .route("/convert-pdf-to-excel", post(handlers::convert_pdf_to_excel))
        .route("/api/health", get(handlers::health_check))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
