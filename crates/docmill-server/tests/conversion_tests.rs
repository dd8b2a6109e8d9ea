// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end tests for the conversion routes.

mod common;

use axum::http::StatusCode;
use common::*;
use docmill_core::ServiceConfig;
use tower::ServiceExt;

#[tokio::test]
async fn test_convert_jpg_to_pdf_success() {
    let request = multipart_request(
        "/convert-jpg-to-pdf",
        vec![Part::file("file", "holiday.jpg", "image/jpeg", jpeg(1000, 1500, [10, 120, 200]))],
    );

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-type"), "application/pdf");
    assert!(header(&response, "content-disposition").contains("filename=\"holiday.pdf\""));

    let body = body_bytes(response).await;
    assert!(body.starts_with(b"%PDF"));
    assert_eq!(pdf_page_count(&body), 1);
}

#[tokio::test]
async fn test_convert_jpg_to_pdf_rejects_png() {
    let request = multipart_request(
        "/convert-jpg-to-pdf",
        vec![Part::file("file", "diagram.png", "image/png", jpeg(10, 10, [0, 0, 0]))],
    );

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "Invalid file format. Please upload a JPG image."
    );
}

#[tokio::test]
async fn test_missing_file_field() {
    let request = multipart_request("/convert-jpg-to-pdf", vec![Part::text("comment", "hi")]);

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "No file uploaded");
}

#[tokio::test]
async fn test_empty_file_name() {
    let request = multipart_request(
        "/convert-pdf-to-word",
        vec![Part::file("file", "", "application/octet-stream", Vec::new())],
    );

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "No file selected");
}

#[tokio::test]
async fn test_corrupt_jpeg_is_server_error() {
    let request = multipart_request(
        "/convert-jpg-to-pdf",
        vec![Part::file("file", "broken.jpg", "image/jpeg", b"not a jpeg".to_vec())],
    );

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_merge_jpg_skips_other_formats() {
    let request = multipart_request(
        "/merge-jpg-to-pdf",
        vec![
            Part::file("files", "one.jpg", "image/jpeg", jpeg(100, 100, [255, 0, 0])),
            Part::file("files", "two.JPEG", "image/jpeg", jpeg(1000, 1500, [0, 255, 0])),
            Part::file("files", "three.png", "image/png", jpeg(20, 20, [0, 0, 0])),
            Part::file("files", "four.jpg", "image/jpeg", jpeg(3000, 200, [0, 0, 255])),
        ],
    );

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(header(&response, "content-disposition").contains("merged_images.pdf"));
    let body = body_bytes(response).await;
    assert_eq!(pdf_page_count(&body), 3);
}

#[tokio::test]
async fn test_merge_jpg_no_valid_files() {
    let request = multipart_request(
        "/merge-jpg-to-pdf",
        vec![Part::file("files", "notes.txt", "text/plain", b"hello".to_vec())],
    );

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "Invalid file format. Please upload JPG images."
    );
}

#[tokio::test]
async fn test_merge_pdf_success() {
    let request = multipart_request(
        "/merge-pdf",
        vec![
            Part::file("files", "a.pdf", "application/pdf", text_pdf(&["a1", "a2"])),
            Part::file("files", "b.pdf", "application/pdf", text_pdf(&["b1"])),
        ],
    );

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-type"), "application/pdf");
    assert!(header(&response, "content-disposition").contains("merged_document.pdf"));
    let body = body_bytes(response).await;
    assert_eq!(pdf_page_count(&body), 3);
}

#[tokio::test]
async fn test_merge_pdf_without_files() {
    let request = multipart_request("/merge-pdf", vec![Part::text("comment", "nothing attached")]);

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "Invalid file format. Please upload PDF documents."
    );
}

#[tokio::test]
async fn test_convert_pdf_to_word() {
    let request = multipart_request(
        "/convert-pdf-to-word",
        vec![Part::file(
            "file",
            "minutes.pdf",
            "application/pdf",
            text_pdf(&["Meeting minutes", "Action items"]),
        )],
    );

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "content-type"),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    assert!(header(&response, "content-disposition").contains("filename=\"minutes.docx\""));

    let body = body_bytes(response).await;
    let xml = zip_part(&body, "word/document.xml");
    assert!(xml.contains("Meeting minutes"));
    assert!(xml.contains("Action items"));
}

#[tokio::test]
async fn test_convert_pdf_to_word_rejects_jpeg() {
    let request = multipart_request(
        "/convert-pdf-to-word",
        vec![Part::file("file", "scan.jpg", "image/jpeg", jpeg(10, 10, [1, 1, 1]))],
    );

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "Invalid file format. Please upload a PDF document."
    );
}

#[tokio::test]
async fn test_convert_pdf_to_excel() {
    let request = multipart_request(
        "/convert-pdf-to-excel",
        vec![Part::file(
            "file",
            "sales.pdf",
            "application/pdf",
            text_pdf(&["Region   Sales\nNorth    1200\nSouth    980"]),
        )],
    );

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "content-type"),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert!(header(&response, "content-disposition").contains("filename=\"sales.xlsx\""));

    let body = body_bytes(response).await;
    let sheet = zip_part(&body, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(">Region<"));
    assert!(sheet.contains(">980<"));
}

#[tokio::test]
async fn test_convert_pdf_to_excel_without_tables() {
    let request = multipart_request(
        "/convert-pdf-to-excel",
        vec![Part::file(
            "file",
            "letter.pdf",
            "application/pdf",
            text_pdf(&["Dear reader, this page is prose."]),
        )],
    );

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains("no tables found"));
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() {
    let config = ServiceConfig {
        max_upload_bytes: 1024,
        ..ServiceConfig::default()
    };
    let request = multipart_request(
        "/convert-pdf-to-word",
        vec![Part::file("file", "big.pdf", "application/pdf", vec![b'x'; 8 * 1024])],
    );

    let response = app_with(config).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_scratch_files_are_removed() {
    let scratch = tempfile::tempdir().unwrap();
    let config = ServiceConfig {
        temp_dir: Some(scratch.path().to_path_buf()),
        ..ServiceConfig::default()
    };
    let request = multipart_request(
        "/merge-pdf",
        vec![Part::file("files", "a.pdf", "application/pdf", text_pdf(&["only"]))],
    );

    let response = app_with(config).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
}
