// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Route handlers.
//
// Every conversion runs inside a span tagged with a fresh `ConversionId`.
// Decoding, resampling and packaging are CPU-bound and run on the blocking
// pool; the artifact is staged through a scratch file before it is served.

use axum::Json;
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use docmill_core::types::{Artifact, ConversionId};
use docmill_document::DocumentConverter;
use tracing::{Instrument, Span, info, info_span};

use crate::AppState;
use crate::error::AppError;
use crate::response::attachment;
use crate::scratch;
use crate::upload::{self, FILE_FIELD, FILES_FIELD};

/// `POST /convert-jpg-to-pdf`
pub async fn convert_jpg_to_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let span = info_span!("convert_jpg_to_pdf", conversion_id = %ConversionId::new());
    async move {
        let file = upload::single_file(multipart, FILE_FIELD).await?;
        run(&state, move |converter| converter.image_to_pdf(&file)).await
    }
    .instrument(span)
    .await
}

/// `POST /merge-jpg-to-pdf`
pub async fn merge_jpg_to_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let span = info_span!("merge_jpg_to_pdf", conversion_id = %ConversionId::new());
    async move {
        let files = upload::many_files(multipart, FILES_FIELD).await?;
        run(&state, move |converter| converter.merge_images(&files)).await
    }
    .instrument(span)
    .await
}

/// `POST /merge-pdf`
pub async fn merge_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let span = info_span!("merge_pdf", conversion_id = %ConversionId::new());
    async move {
        let files = upload::many_files(multipart, FILES_FIELD).await?;
        run(&state, move |converter| converter.merge_pdfs(&files)).await
    }
    .instrument(span)
    .await
}

/// `POST /convert-pdf-to-word`
pub async fn convert_pdf_to_word(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let span = info_span!("convert_pdf_to_word", conversion_id = %ConversionId::new());
    async move {
        let file = upload::single_file(multipart, FILE_FIELD).await?;
        run(&state, move |converter| converter.pdf_to_word(&file)).await
    }
    .instrument(span)
    .await
}

/// `POST /convert-pdf-to-excel`
pub async fn convert_pdf_to_excel(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let span = info_span!("convert_pdf_to_excel", conversion_id = %ConversionId::new());
    async move {
        let file = upload::single_file(multipart, FILE_FIELD).await?;
        run(&state, move |converter| converter.pdf_to_excel(&file)).await
    }
    .instrument(span)
    .await
}

/// `GET /api/health`
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "docmill",
        "version": env!("CARGO_PKG_VERSION"),
        "started_at": state.started_at.to_rfc3339(),
    }))
}

/// Run `convert` on the blocking pool, stage its artifact and build the
/// download response.
async fn run<F>(state: &AppState, convert: F) -> Result<Response, AppError>
where
    F: FnOnce(&DocumentConverter) -> docmill_core::error::Result<Artifact> + Send + 'static,
{
    let converter = state.converter.clone();
    let scratch_dir = state.scratch_dir.clone();
    let span = Span::current();

    let artifact = tokio::task::spawn_blocking(move || {
        span.in_scope(|| {
            let artifact = convert(&converter)?;
            scratch::stage(scratch_dir.as_deref(), artifact)
        })
    })
    .await??;

    info!(
        file = %artifact.file_name,
        output_bytes = artifact.data.len(),
        "Conversion complete"
    );
    Ok(attachment(artifact))
}
