// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — reading and merging existing PDFs, writing composed pages.

pub mod reader;
pub mod writer;

pub use reader::{PdfMerger, PdfReader};
pub use writer::PdfWriter;
