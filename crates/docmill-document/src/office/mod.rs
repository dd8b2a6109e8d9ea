// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Office module — Word and Excel output packages.

pub mod docx;
pub mod xlsx;

pub use docx::DocxWriter;
pub use xlsx::{Sheet, XlsxWriter};
