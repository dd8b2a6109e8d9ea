// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocmillError, Result};

/// Environment variable naming a JSON configuration file.
pub const CONFIG_PATH_ENV: &str = "DOCMILL_CONFIG";

/// Environment variable overriding the listen port.
pub const PORT_ENV: &str = "DOCMILL_PORT";

/// Settings injected into the conversion service at start-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to.
    pub bind_address: String,
    /// Port for the HTTP server (default 5000).
    pub port: u16,
    /// Page every image is composited onto.
    pub paper_size: crate::PaperSize,
    /// Accepted extensions for the image routes (without the dot).
    pub image_extensions: Vec<String>,
    /// Accepted extensions for the PDF routes (without the dot).
    pub pdf_extensions: Vec<String>,
    /// Upper bound on a request body, in bytes.
    pub max_upload_bytes: usize,
    /// Directory for scratch files. `None` uses the system temp directory.
    pub temp_dir: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".into(),
            port: 5000,
            paper_size: crate::PaperSize::A4,
            image_extensions: vec!["jpg".into(), "jpeg".into()],
            pdf_extensions: vec!["pdf".into()],
            max_upload_bytes: 64 * 1024 * 1024,
            temp_dir: None,
        }
    }
}

impl ServiceConfig {
    /// Read a JSON config file. Missing keys take their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Build the configuration from the process environment: the file named
    /// by `DOCMILL_CONFIG` if set, then a `DOCMILL_PORT` override.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Ok(port) = std::env::var(PORT_ENV) {
            config.port = port
                .parse()
                .map_err(|_| DocmillError::Config(format!("{PORT_ENV}={port} is not a port")))?;
        }

        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.paper_size.dimensions_pt();
        if width == 0 || height == 0 {
            return Err(DocmillError::Config(format!(
                "page dimensions must be positive, got {width}x{height}"
            )));
        }
        if self.image_extensions.is_empty() {
            return Err(DocmillError::Config("image_extensions is empty".into()));
        }
        if self.pdf_extensions.is_empty() {
            return Err(DocmillError::Config("pdf_extensions is empty".into()));
        }
        Ok(())
    }

    /// `bind_address:port`, ready for `TcpListener::bind`.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
