// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Docmill.

use thiserror::Error;

/// Top-level error type for all Docmill operations.
#[derive(Debug, Error)]
pub enum DocmillError {
    // -- Request errors --
    #[error("No file uploaded")]
    MissingFile,

    #[error("No file selected")]
    NoFileSelected,

    /// Extension outside the allow-list. The message is shown to the user
    /// verbatim.
    #[error("{0}")]
    InvalidFormat(String),

    // -- Document errors --
    #[error("failed to decode input: {0}")]
    Decode(String),

    #[error("conversion failed: {0}")]
    Conversion(String),

    // -- Storage / configuration --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Coarse classification of a failure, used to pick the response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller sent something we refuse to process (400).
    InvalidInput,
    /// The upload was accepted but its content is corrupt or unreadable (500).
    DecodeFailure,
    /// A library or I/O step failed while producing the artifact (500).
    ConversionFailure,
}

impl DocmillError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingFile | Self::NoFileSelected | Self::InvalidFormat(_) => {
                ErrorKind::InvalidInput
            }
            Self::Decode(_) => ErrorKind::DecodeFailure,
            Self::Conversion(_) | Self::Io(_) | Self::Serialization(_) | Self::Config(_) => {
                ErrorKind::ConversionFailure
            }
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocmillError>;
