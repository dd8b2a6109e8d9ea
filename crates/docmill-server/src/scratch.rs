// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scoped temporary files for staging generated artifacts.

use std::io::Write;
use std::path::Path;

use docmill_core::error::Result;
use docmill_core::types::{Artifact, DocumentType};
use tempfile::NamedTempFile;
use tracing::debug;

const PREFIX: &str = "docmill-";

/// A temporary file that is removed when the guard is dropped, whether the
/// request succeeded or not.
#[derive(Debug)]
pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    /// Create an empty scratch file named `docmill-*.<ext>` in `dir`, or in
    /// the system temp directory when `dir` is `None`.
    pub fn create(dir: Option<&Path>, document_type: DocumentType) -> Result<Self> {
        let suffix = format!(".{}", document_type.extension());
        let mut builder = tempfile::Builder::new();
        builder.prefix(PREFIX).suffix(&suffix);

        let file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        debug!(path = %file.path().display(), "Scratch file created");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<()> {
        let file = self.file.as_file_mut();
        file.write_all(data)?;
        file.flush()?;
        Ok(())
    }

    pub fn read_to_vec(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(self.file.path())?)
    }
}

/// Write the artifact to a scratch file and serve the bytes read back from
/// it. The file is gone by the time this returns.
pub fn stage(dir: Option<&Path>, artifact: Artifact) -> Result<Artifact> {
    let mut scratch = ScratchFile::create(dir, artifact.document_type)?;
    scratch.write_all(&artifact.data)?;
    let data = scratch.read_to_vec()?;
    Ok(Artifact { data, ..artifact })
}
