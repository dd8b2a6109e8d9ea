// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// XLSX writer — package tables as an Office Open XML spreadsheet.
//
// The workbook is the minimal SpreadsheetML package: content types, package
// relationships, the workbook part with its relationships, and one worksheet
// part per sheet. Cells are written as inline strings, so no shared-string
// table or style part is needed.

use std::io::{Cursor, Write};

use docmill_core::error::{DocmillError, Result};
use quick_xml::escape::escape;
use tracing::{debug, instrument};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Excel refuses sheet names longer than this.
const MAX_SHEET_NAME_LEN: usize = 31;

/// One worksheet: a name and its rows of text cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

/// Writes sheets into an `.xlsx` package.
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxWriter;

impl XlsxWriter {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip_all, fields(sheets = sheets.len()))]
    pub fn write_sheets(&self, sheets: &[Sheet]) -> Result<Vec<u8>> {
        if sheets.is_empty() {
            return Err(DocmillError::Conversion(
                "a workbook needs at least one sheet".into(),
            ));
        }

        let names: Vec<String> = sheets
            .iter()
            .enumerate()
            .map(|(index, sheet)| sanitise_sheet_name(&sheet.name, index))
            .collect();

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut add = |path: &str, body: String| -> Result<()> {
            zip.start_file(path, options).map_err(zip_error)?;
            zip.write_all(body.as_bytes())?;
            Ok(())
        };

        add("[Content_Types].xml", content_types(sheets.len()))?;
        add("_rels/.rels", PACKAGE_RELS.to_string())?;
        add("xl/workbook.xml", workbook(&names))?;
        add("xl/_rels/workbook.xml.rels", workbook_rels(sheets.len()))?;
        for (index, sheet) in sheets.iter().enumerate() {
            add(
                &format!("xl/worksheets/sheet{}.xml", index + 1),
                worksheet(&sheet.rows),
            )?;
        }

        let output = zip.finish().map_err(zip_error)?.into_inner();
        debug!(output_bytes = output.len(), "XLSX written");
        Ok(output)
    }
}

fn zip_error(err: zip::result::ZipError) -> DocmillError {
    DocmillError::Conversion(format!("failed to package XLSX: {}", err))
}

const PACKAGE_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    r#"</Relationships>"#,
);

fn content_types(sheet_count: usize) -> String {
    let mut xml = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
        r#"<Default Extension="xml" ContentType="application/xml"/>"#,
        r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
    ));
    for n in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn workbook(names: &[String]) -> String {
    let mut xml = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        "<sheets>",
    ));
    for (index, name) in names.iter().enumerate() {
        let n = index + 1;
        xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{n}" r:id="rId{n}"/>"#,
            escape_xml(name)
        ));
    }
    xml.push_str("</sheets></workbook>");
    xml
}

fn workbook_rels(sheet_count: usize) -> String {
    let mut xml = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    ));
    for n in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{n}.xml"/>"#
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn worksheet(rows: &[Vec<String>]) -> String {
    let mut xml = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        "<sheetData>",
    ));
    for (row_index, row) in rows.iter().enumerate() {
        let r = row_index + 1;
        xml.push_str(&format!(r#"<row r="{r}">"#));
        for (col_index, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            xml.push_str(&format!(
                r#"<c r="{}{r}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                column_name(col_index),
                escape_xml(cell)
            ));
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Spreadsheet column letters for a zero-based index: 0 → A, 25 → Z, 26 → AA.
fn column_name(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Strip characters Excel forbids in sheet names and cap the length.
fn sanitise_sheet_name(name: &str, index: usize) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '\\' | '/' | '?' | '*' | '[' | ']' | ':'))
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim_matches('\'').trim().to_string();
    if cleaned.is_empty() {
        format!("Sheet{}", index + 1)
    } else {
        cleaned
    }
}

/// Escape text for XML content and attributes, dropping control characters
/// XML 1.0 cannot represent.
fn escape_xml(text: &str) -> String {
    let printable: String = text
        .chars()
        .filter(|c| matches!(c, '\t' | '\n' | '\r') || *c >= ' ')
        .collect();
    escape(&printable).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn part(xlsx: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(xlsx)).unwrap();
        let mut xml = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        xml
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn column_letters() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(701), "ZZ");
        assert_eq!(column_name(702), "AAA");
    }

    #[test]
    fn writes_one_worksheet_per_sheet() {
        let sheets = vec![
            Sheet::new("Sheet1", vec![row(&["Item", "Qty"]), row(&["Bolts", "12"])]),
            Sheet::new("Sheet2", vec![row(&["A & B", "<c>"])]),
        ];
        let bytes = XlsxWriter::new().write_sheets(&sheets).unwrap();

        let workbook = part(&bytes, "xl/workbook.xml");
        assert!(workbook.contains(r#"name="Sheet1""#));
        assert!(workbook.contains(r#"name="Sheet2""#));

        let first = part(&bytes, "xl/worksheets/sheet1.xml");
        assert!(first.contains(r#"<c r="A1" t="inlineStr">"#));
        assert!(first.contains(">Bolts<"));
        assert!(first.contains(r#"<c r="B2""#));

        let second = part(&bytes, "xl/worksheets/sheet2.xml");
        assert!(second.contains("A &amp; B"));
        assert!(second.contains("&lt;c&gt;"));

        let types = part(&bytes, "[Content_Types].xml");
        assert!(types.contains("/xl/worksheets/sheet2.xml"));
    }

    #[test]
    fn empty_cells_are_omitted() {
        let xml = worksheet(&[row(&["a", "", "c"])]);
        assert!(xml.contains(r#"r="A1""#));
        assert!(!xml.contains(r#"r="B1""#));
        assert!(xml.contains(r#"r="C1""#));
    }

    #[test]
    fn sheet_names_are_sanitised() {
        assert_eq!(sanitise_sheet_name("Q1/Q2 [draft]", 0), "Q1Q2 draft");
        assert_eq!(sanitise_sheet_name("???", 4), "Sheet5");
        assert_eq!(sanitise_sheet_name(&"x".repeat(40), 0).len(), 31);
    }

    #[test]
    fn control_characters_are_dropped() {
        assert_eq!(escape_xml("a\u{1}b\tc"), "ab\tc");
        assert_eq!(escape_xml("line\r\nbreak"), "line\r\nbreak");
    }

    #[test]
    fn markup_characters_are_escaped() {
        assert_eq!(escape_xml("A & B"), "A &amp; B");
        assert_eq!(escape_xml("<b>"), "&lt;b&gt;");
        assert_eq!(escape_xml(r#"O'Neil "Ltd""#), "O&apos;Neil &quot;Ltd&quot;");

        let xml = workbook(&[r#"Q&A "draft""#.to_string()]);
        assert!(xml.contains(r#"name="Q&amp;A &quot;draft&quot;""#));
    }

    #[test]
    fn no_sheets_is_an_error() {
        assert!(XlsxWriter::new().write_sheets(&[]).is_err());
    }
}
