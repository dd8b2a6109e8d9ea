// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX writer — lay extracted page text out as Word paragraphs using
// `docx-rs`.

use std::io::Cursor;

use docmill_core::error::{DocmillError, Result};
use docx_rs::{BreakType, Docx, Paragraph, Run};
use tracing::{debug, instrument};

/// Writes plain page text into a Word document: one paragraph per line,
/// a page break between pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxWriter;

impl DocxWriter {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip_all, fields(pages = pages.len()))]
    pub fn write_pages<S: AsRef<str>>(&self, pages: &[S]) -> Result<Vec<u8>> {
        let mut docx = Docx::new();
        let mut paragraphs = 0usize;

        for (index, page) in pages.iter().enumerate() {
            if index > 0 {
                docx = docx.add_paragraph(
                    Paragraph::new().add_run(Run::new().add_break(BreakType::Page)),
                );
            }

            let mut lines = page.as_ref().lines().peekable();
            if lines.peek().is_none() {
                docx = docx.add_paragraph(Paragraph::new());
                paragraphs += 1;
                continue;
            }

            for line in lines {
                docx = docx.add_paragraph(
                    Paragraph::new().add_run(Run::new().add_text(line.trim_end())),
                );
                paragraphs += 1;
            }
        }

        let mut buffer = Cursor::new(Vec::new());
        docx.build().pack(&mut buffer).map_err(|err| {
            DocmillError::Conversion(format!("failed to package DOCX: {}", err))
        })?;

        let output = buffer.into_inner();
        debug!(paragraphs, output_bytes = output.len(), "DOCX written");
        Ok(output)
    }
}
