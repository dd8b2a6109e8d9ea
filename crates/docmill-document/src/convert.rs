// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The five user-facing conversions.
//
// `DocumentConverter` is built once from the service configuration and shared
// between requests. It holds no mutable state; every operation takes the
// uploaded files and returns the finished artifact.

use std::sync::Arc;

use docmill_core::config::ServiceConfig;
use docmill_core::error::{DocmillError, Result};
use docmill_core::types::{Artifact, DocumentType, SourceFile};
use tracing::{debug, info, instrument};

use crate::image::PageCompositor;
use crate::office::{DocxWriter, Sheet, XlsxWriter};
use crate::pdf::{PdfMerger, PdfReader, PdfWriter};
use crate::tables::{TableDetector, WhitespaceTableDetector};

const INVALID_IMAGE: &str = "Invalid file format. Please upload a JPG image.";
const INVALID_IMAGES: &str = "Invalid file format. Please upload JPG images.";
const INVALID_PDFS: &str = "Invalid file format. Please upload PDF documents.";
const INVALID_PDF: &str = "Invalid file format. Please upload a PDF document.";

const MERGED_IMAGES_NAME: &str = "merged_images.pdf";
const MERGED_DOCUMENT_NAME: &str = "merged_document.pdf";

/// Converts uploaded files into downloadable artifacts.
#[derive(Clone)]
pub struct DocumentConverter {
    compositor: PageCompositor,
    image_extensions: Vec<String>,
    pdf_extensions: Vec<String>,
    table_detector: Arc<dyn TableDetector>,
}

impl std::fmt::Debug for DocumentConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentConverter")
            .field("compositor", &self.compositor)
            .field("image_extensions", &self.image_extensions)
            .field("pdf_extensions", &self.pdf_extensions)
            .finish_non_exhaustive()
    }
}

impl DocumentConverter {
    /// Converter using the whitespace table heuristic.
    pub fn new(config: &ServiceConfig) -> Self {
        Self::with_table_detector(config, Arc::new(WhitespaceTableDetector::default()))
    }

    pub fn with_table_detector(
        config: &ServiceConfig,
        table_detector: Arc<dyn TableDetector>,
    ) -> Self {
        Self {
            compositor: PageCompositor::new(config.paper_size),
            image_extensions: config.image_extensions.clone(),
            pdf_extensions: config.pdf_extensions.clone(),
            table_detector,
        }
    }

    /// Put a single image on a page and return it as `<stem>.pdf`.
    #[instrument(skip_all, fields(file = %file.file_name, bytes_len = file.data.len()))]
    pub fn image_to_pdf(&self, file: &SourceFile) -> Result<Artifact> {
        if !file.has_extension_in(&self.image_extensions) {
            return Err(DocmillError::InvalidFormat(INVALID_IMAGE.into()));
        }

        let canvas = self.compositor.compose_bytes(&file.data)?;
        let mut writer = PdfWriter::new();
        writer.set_title(file.stem());
        let pdf = writer.write_pages(std::slice::from_ref(&canvas))?;

        info!(output_bytes = pdf.len(), "Image converted to PDF");
        Ok(Artifact::derived_from(file, DocumentType::Pdf, pdf))
    }

    /// One page per accepted image, in upload order. Files with other
    /// extensions are skipped.
    #[instrument(skip_all, fields(files = files.len()))]
    pub fn merge_images(&self, files: &[SourceFile]) -> Result<Artifact> {
        let accepted = accepted(files, &self.image_extensions);
        if accepted.is_empty() {
            return Err(DocmillError::InvalidFormat(INVALID_IMAGES.into()));
        }

        let canvases = accepted
            .iter()
            .map(|file| self.compositor.compose_bytes(&file.data))
            .collect::<Result<Vec<_>>>()?;

        let mut writer = PdfWriter::new();
        writer.set_title("Merged images");
        let pdf = writer.write_pages(&canvases)?;

        info!(
            pages = canvases.len(),
            output_bytes = pdf.len(),
            "Images merged into PDF"
        );
        Ok(Artifact::new(pdf, DocumentType::Pdf, MERGED_IMAGES_NAME))
    }

    /// Concatenate every page of every accepted PDF, in upload order.
    #[instrument(skip_all, fields(files = files.len()))]
    pub fn merge_pdfs(&self, files: &[SourceFile]) -> Result<Artifact> {
        let accepted = accepted(files, &self.pdf_extensions);
        if accepted.is_empty() {
            return Err(DocmillError::InvalidFormat(INVALID_PDFS.into()));
        }

        let documents: Vec<&[u8]> = accepted.iter().map(|file| file.data.as_slice()).collect();
        let (pdf, page_count) = PdfMerger::merge(&documents)?;
        if page_count == 0 {
            return Err(DocmillError::InvalidFormat(INVALID_PDFS.into()));
        }

        info!(
            documents = documents.len(),
            page_count,
            output_bytes = pdf.len(),
            "PDFs merged"
        );
        Ok(Artifact::new(pdf, DocumentType::Pdf, MERGED_DOCUMENT_NAME))
    }

    /// Extract the text of a PDF into a Word document named `<stem>.docx`.
    #[instrument(skip_all, fields(file = %file.file_name, bytes_len = file.data.len()))]
    pub fn pdf_to_word(&self, file: &SourceFile) -> Result<Artifact> {
        if !file.has_extension_in(&self.pdf_extensions) {
            return Err(DocmillError::InvalidFormat(INVALID_PDF.into()));
        }

        let reader = PdfReader::from_bytes(&file.data)?;
        let pages = reader.page_texts();
        let docx = DocxWriter::new().write_pages(&pages)?;

        info!(pages = pages.len(), output_bytes = docx.len(), "PDF converted to Word");
        Ok(Artifact::derived_from(file, DocumentType::Docx, docx))
    }

    /// Write every table found in a PDF to its own worksheet of
    /// `<stem>.xlsx`.
    #[instrument(skip_all, fields(file = %file.file_name, bytes_len = file.data.len()))]
    pub fn pdf_to_excel(&self, file: &SourceFile) -> Result<Artifact> {
        if !file.has_extension_in(&self.pdf_extensions) {
            return Err(DocmillError::InvalidFormat(INVALID_PDF.into()));
        }

        let reader = PdfReader::from_bytes(&file.data)?;
        let sheets: Vec<Sheet> = reader
            .page_texts()
            .iter()
            .flat_map(|text| self.table_detector.detect(text))
            .enumerate()
            .map(|(index, table)| Sheet::new(format!("Sheet{}", index + 1), table.into_padded_rows()))
            .collect();

        if sheets.is_empty() {
            return Err(DocmillError::Conversion(format!(
                "no tables found in {}",
                file.file_name
            )));
        }

        let xlsx = XlsxWriter::new().write_sheets(&sheets)?;

        info!(sheets = sheets.len(), output_bytes = xlsx.len(), "PDF converted to Excel");
        Ok(Artifact::derived_from(file, DocumentType::Xlsx, xlsx))
    }
}

/// Files whose extension is on `allowed`, in their original order.
fn accepted<'a>(files: &'a [SourceFile], allowed: &[String]) -> Vec<&'a SourceFile> {
    files
        .iter()
        .filter(|file| {
            let keep = file.has_extension_in(allowed);
            if !keep {
                debug!(file = %file.file_name, "Skipping file with unsupported extension");
            }
            keep
        })
        .collect()
}
