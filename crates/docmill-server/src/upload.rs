// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Multipart upload extraction.
//
// Only parts that carry a `filename` count as uploads; plain form fields with
// the same name are ignored.

use axum::extract::Multipart;
use docmill_core::DocmillError;
use docmill_core::types::SourceFile;
use tracing::info;

use crate::error::AppError;

/// Field name of the single-file forms.
pub const FILE_FIELD: &str = "file";

/// Field name of the merge forms.
pub const FILES_FIELD: &str = "files";

/// The first upload in `field`.
///
/// No such upload is `MissingFile`; an upload with an empty file name (a
/// form submitted without choosing a file) is `NoFileSelected`.
pub async fn single_file(mut multipart: Multipart, field: &str) -> Result<SourceFile, AppError> {
    while let Some(part) = multipart.next_field().await? {
        if part.name() != Some(field) {
            continue;
        }
        let Some(file_name) = part.file_name().map(str::to_owned) else {
            continue;
        };
        if file_name.is_empty() {
            return Err(DocmillError::NoFileSelected.into());
        }

        let data = part.bytes().await?;
        let file = SourceFile::new(file_name, data.to_vec());
        log_upload(&file);
        return Ok(file);
    }
    Err(DocmillError::MissingFile.into())
}

/// Every upload in `field`, in the order the client sent them. Uploads
/// with an empty file name are kept; extension checks reject them later.
pub async fn many_files(mut multipart: Multipart, field: &str) -> Result<Vec<SourceFile>, AppError> {
    let mut files = Vec::new();
    while let Some(part) = multipart.next_field().await? {
        if part.name() != Some(field) {
            continue;
        }
        let Some(file_name) = part.file_name().map(str::to_owned) else {
            continue;
        };

        let data = part.bytes().await?;
        let file = SourceFile::new(file_name, data.to_vec());
        log_upload(&file);
        files.push(file);
    }
    Ok(files)
}

fn log_upload(file: &SourceFile) {
    info!(
        file = %file.file_name,
        bytes_len = file.data.len(),
        sha256 = %file.sha256_hex(),
        "Upload received"
    );
}
