// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared fixtures for the HTTP integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Read, Write};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use docmill_core::ServiceConfig;
use docmill_document::DocumentConverter;
use image::{Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

const BOUNDARY: &str = "----DocmillTestBoundary7MA4YWxkTrZu0gW";

pub fn test_app() -> Router {
    app_with(ServiceConfig::default())
}

pub fn app_with(config: ServiceConfig) -> Router {
    let converter = DocumentConverter::new(&config);
    docmill_server::app(converter, &config)
}

/// One part of a multipart body.
pub struct Part {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: &'static str,
    pub data: Vec<u8>,
}

impl Part {
    pub fn file(field: &str, file_name: &str, content_type: &'static str, data: Vec<u8>) -> Self {
        Self {
            field: field.to_string(),
            file_name: Some(file_name.to_string()),
            content_type,
            data,
        }
    }

    pub fn text(field: &str, value: &str) -> Self {
        Self {
            field: field.to_string(),
            file_name: None,
            content_type: "text/plain",
            data: value.as_bytes().to_vec(),
        }
    }
}

/// Build a `multipart/form-data` POST to `uri`.
pub fn multipart_request(uri: &str, parts: Vec<Part>) -> Request<Body> {
    let mut body = Vec::new();

    for part in &parts {
        write!(body, "--{}\r\n", BOUNDARY).unwrap();
        match &part.file_name {
            Some(file_name) => write!(
                body,
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.field, file_name
            )
            .unwrap(),
            None => write!(
                body,
                "Content-Disposition: form-data; name=\"{}\"\r\n",
                part.field
            )
            .unwrap(),
        }
        write!(body, "Content-Type: {}\r\n\r\n", part.content_type).unwrap();
        body.extend_from_slice(&part.data);
        write!(body, "\r\n").unwrap();
    }
    write!(body, "--{}--\r\n", BOUNDARY).unwrap();

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub fn header<'a>(response: &'a Response<Body>, name: &str) -> &'a str {
    response.headers().get(name).unwrap().to_str().unwrap()
}

/// Solid-colour JPEG.
pub fn jpeg(width: u32, height: u32, colour: [u8; 3]) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb(colour));
    let mut buffer = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, 90);
    image.write_with_encoder(encoder).unwrap();
    buffer
}

/// PDF with one page per entry; each line of an entry is its own text
/// object.
pub fn text_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for page_text in pages {
        let mut operations = Vec::new();
        for (index, line) in page_text.lines().enumerate() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), Object::Integer(10)]));
            operations.push(Operation::new(
                "Td",
                vec![Object::Integer(50), Object::Integer(780 - 14 * index as i64)],
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(line)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ],
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

pub fn pdf_page_count(bytes: &[u8]) -> usize {
    Document::load_mem(bytes).unwrap().get_pages().len()
}

/// Read one part of an Office Open XML package.
pub fn zip_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut xml = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}
