// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docmill-document — Document conversions for the Docmill service.
//
// Provides page composition (image → fixed-size page canvas), PDF operations
// (write composed pages, read, extract text, merge), office output (DOCX,
// XLSX), table detection, and the `DocumentConverter` that ties them into
// the five user-facing conversions.

pub mod convert;
pub mod image;
pub mod office;
pub mod pdf;
pub mod tables;

// Re-export the primary structs so callers can use `docmill_document::PdfReader` etc.
pub use convert::DocumentConverter;
pub use self::image::compositor::{PageCanvas, PageCompositor, Placement};
pub use office::docx::DocxWriter;
pub use office::xlsx::{Sheet, XlsxWriter};
pub use pdf::reader::{PdfMerger, PdfReader};
pub use pdf::writer::PdfWriter;
pub use tables::{Table, TableDetector, WhitespaceTableDetector};
