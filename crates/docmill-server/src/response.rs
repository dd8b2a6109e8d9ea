// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Download responses.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use docmill_core::types::Artifact;

/// Serve `artifact` as a file download.
pub fn attachment(artifact: Artifact) -> Response {
    let headers = [
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static(artifact.mime_type()),
        ),
        (
            header::CONTENT_DISPOSITION,
            content_disposition(&artifact.file_name),
        ),
    ];
    (StatusCode::OK, headers, artifact.data).into_response()
}

/// `attachment` with an ASCII `filename` for old clients and an RFC 5987
/// `filename*` carrying the exact UTF-8 name.
pub fn content_disposition(file_name: &str) -> HeaderValue {
    let value = format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii_fallback(file_name),
        urlencoding::encode(file_name)
    );
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

fn ascii_fallback(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c == ' ' || c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmill_core::types::DocumentType;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(
            content_disposition("report.docx"),
            "attachment; filename=\"report.docx\"; filename*=UTF-8''report.docx"
        );
    }

    #[test]
    fn non_ascii_names_are_encoded() {
        let value = content_disposition("résumé final.pdf");
        assert_eq!(
            value,
            "attachment; filename=\"r_sum_ final.pdf\"; filename*=UTF-8''r%C3%A9sum%C3%A9%20final.pdf"
        );
    }

    #[test]
    fn separators_in_names_are_encoded() {
        let value = content_disposition("Q&A; 50%.pdf");
        assert!(value
            .to_str()
            .unwrap()
            .ends_with("filename*=UTF-8''Q%26A%3B%2050%25.pdf"));
    }

    #[test]
    fn quotes_cannot_break_out() {
        let value = content_disposition("a\"b.pdf");
        assert!(value.to_str().unwrap().starts_with("attachment; filename=\"a_b.pdf\""));
    }

    #[test]
    fn attachment_sets_type_and_body() {
        let artifact = Artifact::new(b"PK".to_vec(), DocumentType::Xlsx, "t.xlsx");
        let response = attachment(artifact);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
    }
}
