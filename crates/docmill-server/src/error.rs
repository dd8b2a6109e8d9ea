// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Mapping of conversion failures onto HTTP responses.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use docmill_core::{DocmillError, ErrorKind};
use thiserror::Error;
use tracing::{error, warn};

/// Anything a request handler can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Docmill(#[from] DocmillError),

    /// Malformed or oversized multipart body.
    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error("conversion task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Docmill(err) => match err.kind() {
                ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                ErrorKind::DecodeFailure | ErrorKind::ConversionFailure => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Multipart(err) => err.status(),
            Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Multipart(err) => err.body_text(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            error!(%status, error = %body, "Request failed");
        } else {
            warn!(%status, error = %body, "Request rejected");
        }

        (status, body).into_response()
    }
}
