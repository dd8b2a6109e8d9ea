// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — shrink-to-fit page composition.

pub mod compositor;

pub use compositor::{PageCanvas, PageCompositor, Placement};
