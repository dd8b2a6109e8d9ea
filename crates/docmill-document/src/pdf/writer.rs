// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — serialise composed page canvases into a paginated PDF using
// `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use docmill_core::error::{DocmillError, Result};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use crate::image::PageCanvas;

/// Canvas pixels are laid out one per point.
const CANVAS_DPI: f32 = 72.0;

/// Millimetres per PDF point.
const MM_PER_PT: f32 = 25.4 / 72.0;

/// Writes composed page canvases into a single PDF document.
pub struct PdfWriter {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    pub fn new() -> Self {
        Self { title: None }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Write one page per canvas, in order. Every page has the canvas size
    /// in points and is covered edge to edge by the canvas raster.
    #[instrument(skip_all, fields(pages = canvases.len()))]
    pub fn write_pages(&self, canvases: &[PageCanvas]) -> Result<Vec<u8>> {
        if canvases.is_empty() {
            return Err(DocmillError::Conversion("no pages to write".into()));
        }

        let title = self.title.as_deref().unwrap_or("Docmill Document");
        info!(title, "Creating image PDF");

        let mut doc = PdfDocument::new(title);
        let mut pages: Vec<PdfPage> = Vec::with_capacity(canvases.len());

        for canvas in canvases {
            let width = canvas.width();
            let height = canvas.height();

            let raw = RawImage {
                pixels: RawImageData::U8(canvas.as_rgb().as_raw().clone()),
                width: width as usize,
                height: height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: None,
                    scale_y: None,
                    dpi: Some(CANVAS_DPI),
                    rotate: None,
                },
            }];

            pages.push(PdfPage::new(
                Mm(width as f32 * MM_PER_PT),
                Mm(height as f32 * MM_PER_PT),
                ops,
            ));
        }

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);

        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings while saving");
        }
        debug!(output_bytes = output.len(), "Image PDF written");

        Ok(output)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}
