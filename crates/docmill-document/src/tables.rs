// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Table detection over extracted page text.
//
// Where a table starts and ends is a heuristic, so the policy sits behind the
// `TableDetector` trait and the PDF → Excel conversion takes whichever
// detector it is given.

use tracing::trace;

/// A detected table. The first row is the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Rows after the header.
    pub fn body(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Width of the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Rows padded with empty cells to `column_count`.
    pub fn into_padded_rows(self) -> Vec<Vec<String>> {
        let width = self.column_count();
        self.rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect()
    }
}

/// Finds tables in the text of a single page.
pub trait TableDetector: Send + Sync {
    fn detect(&self, page_text: &str) -> Vec<Table>;
}

/// Treats runs of consecutive lines that split into several columns as a
/// table. Columns are separated by tabs or by `column_gap` or more spaces.
#[derive(Debug, Clone, Copy)]
pub struct WhitespaceTableDetector {
    pub min_columns: usize,
    pub min_rows: usize,
    pub column_gap: usize,
}

impl Default for WhitespaceTableDetector {
    fn default() -> Self {
        Self {
            min_columns: 2,
            min_rows: 2,
            column_gap: 2,
        }
    }
}

impl WhitespaceTableDetector {
    /// Split one line into trimmed cells.
    fn split_cells(&self, line: &str) -> Vec<String> {
        let mut cells = Vec::new();
        let mut current = String::new();
        let mut spaces = 0usize;

        for ch in line.trim().chars() {
            match ch {
                '\t' => {
                    push_cell(&mut cells, &mut current);
                    spaces = 0;
                }
                ' ' => spaces += 1,
                _ => {
                    if spaces >= self.column_gap {
                        push_cell(&mut cells, &mut current);
                    } else {
                        current.extend(std::iter::repeat_n(' ', spaces));
                    }
                    spaces = 0;
                    current.push(ch);
                }
            }
        }
        push_cell(&mut cells, &mut current);
        cells
    }

    fn flush(&self, run: &mut Vec<Vec<String>>, tables: &mut Vec<Table>) {
        if run.len() >= self.min_rows {
            tables.push(Table::new(std::mem::take(run)));
        } else {
            run.clear();
        }
    }
}

fn push_cell(cells: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        cells.push(std::mem::take(current));
    }
}

impl TableDetector for WhitespaceTableDetector {
    fn detect(&self, page_text: &str) -> Vec<Table> {
        let mut tables = Vec::new();
        let mut run: Vec<Vec<String>> = Vec::new();

        for line in page_text.lines() {
            let cells = self.split_cells(line);
            if cells.len() >= self.min_columns.max(1) {
                run.push(cells);
            } else {
                self.flush(&mut run, &mut tables);
            }
        }
        self.flush(&mut run, &mut tables);

        trace!(tables = tables.len(), "Tables detected on page");
        tables
    }
}
