// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Docmill conversion service.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Unique identifier for a single conversion request (used in log spans).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversionId(pub Uuid);

impl ConversionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConversionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Document types Docmill produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Pdf,
    /// Office Open XML word-processing document.
    Docx,
    /// Office Open XML spreadsheet.
    Xlsx,
}

impl DocumentType {
    /// MIME type string for the `Content-Type` header.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    /// Canonical file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Xlsx => "xlsx",
        }
    }
}

/// Standard page sizes, measured in points (72 units per inch).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_pt: u32, height_pt: u32 },
}

impl PaperSize {
    /// Dimensions in points (width, height).
    pub fn dimensions_pt(&self) -> (u32, u32) {
        match self {
            Self::A4 => (595, 842),
            Self::A3 => (842, 1191),
            Self::A5 => (420, 595),
            Self::Letter => (612, 792),
            Self::Legal => (612, 1008),
            Self::Custom {
                width_pt,
                height_pt,
            } => (*width_pt, *height_pt),
        }
    }
}

/// One uploaded file: the client-supplied name and its raw bytes.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl SourceFile {
    pub fn new(file_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    /// Text after the last `.` of the base name, if any.
    pub fn extension(&self) -> Option<&str> {
        let base = base_name(&self.file_name);
        base.rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
    }

    /// Whether the extension matches one of `allowed` (case-insensitive).
    pub fn has_extension_in(&self, allowed: &[String]) -> bool {
        match self.extension() {
            Some(ext) => allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }

    /// Base name without its extension; used to derive download names.
    pub fn stem(&self) -> &str {
        let base = base_name(&self.file_name);
        let stem = match base.rsplit_once('.') {
            Some((stem, _)) => stem,
            None => base,
        };
        if stem.trim().is_empty() {
            "document"
        } else {
            stem
        }
    }

    /// Hex-encoded SHA-256 of the file contents.
    pub fn sha256_hex(&self) -> String {
        hex::encode(Sha256::digest(&self.data))
    }
}

/// Final path component of a client file name. Some browsers send the full
/// local path, with either separator.
fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// A generated output document returned to the caller.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub data: Vec<u8>,
    pub document_type: DocumentType,
    /// Name offered to the client in `Content-Disposition`.
    pub file_name: String,
}

impl Artifact {
    pub fn new(data: Vec<u8>, document_type: DocumentType, file_name: impl Into<String>) -> Self {
        Self {
            data,
            document_type,
            file_name: file_name.into(),
        }
    }

    /// Artifact named after `source` with the extension of `document_type`.
    pub fn derived_from(source: &SourceFile, document_type: DocumentType, data: Vec<u8>) -> Self {
        let file_name = format!("{}.{}", source.stem(), document_type.extension());
        Self::new(data, document_type, file_name)
    }

    pub fn mime_type(&self) -> &'static str {
        self.document_type.mime_type()
    }
}
