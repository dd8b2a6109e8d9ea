// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open, inspect, extract text from, and merge existing PDF
// documents using the `lopdf` crate.

use std::collections::HashMap;

use docmill_core::error::{DocmillError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, info, instrument, warn};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards against malformed page trees whose /Parent chain loops.
const MAX_TREE_DEPTH: usize = 64;

/// Reads an existing PDF file.
///
/// Wraps `lopdf::Document` and provides the inspection and text extraction
/// the conversions need.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data)
            .map_err(|err| DocmillError::Decode(format!("failed to load PDF: {}", err)))?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Extract the text of every page, in page order.
    ///
    /// Pages whose content cannot be decoded yield an empty string so that
    /// one unreadable page does not sink the whole document.
    #[instrument(skip(self), fields(pages = self.page_count()))]
    pub fn page_texts(&self) -> Vec<String> {
        self.document
            .get_pages()
            .keys()
            .map(|&page_number| {
                self.document
                    .extract_text(&[page_number])
                    .unwrap_or_else(|err| {
                        warn!(page_number, %err, "Text extraction failed, treating page as empty");
                        String::new()
                    })
            })
            .collect()
    }
}

/// Concatenates the pages of several PDF documents.
pub struct PdfMerger;

impl PdfMerger {
    /// Merge `documents` into one PDF. Pages appear in input order: every
    /// page of the first document, then every page of the second, and so on.
    ///
    /// Returns the merged bytes and the total page count.
    #[instrument(skip_all, fields(documents = documents.len()))]
    pub fn merge(documents: &[&[u8]]) -> Result<(Vec<u8>, usize)> {
        let (first, rest) = documents
            .split_first()
            .ok_or_else(|| DocmillError::Conversion("no documents to merge".into()))?;

        let mut merged = load_numbered(first, 1)?;

        for (index, other_bytes) in rest.iter().enumerate() {
            let other_doc = load_numbered(other_bytes, index + 2)?;

            let other_pages = other_doc.get_pages();
            debug!(
                document = index + 2,
                pages = other_pages.len(),
                "Appending document"
            );

            // get_pages is keyed by page number, so values come out in order.
            let mut copier = ObjectCopier::new(&other_doc);
            for &page_id in other_pages.values() {
                append_page(&mut copier, &mut merged, page_id)?;
            }
        }

        let page_count = merged.get_pages().len();
        info!(page_count, "Merged PDFs");

        let mut output = Vec::new();
        merged.save_to(&mut output).map_err(|err| {
            DocmillError::Conversion(format!("failed to serialise merged PDF: {}", err))
        })?;

        debug!(output_bytes = output.len(), "Merge complete");
        Ok((output, page_count))
    }
}

fn load_numbered(data: &[u8], position: usize) -> Result<Document> {
    Document::load_mem(data).map_err(|err| {
        DocmillError::Decode(format!("failed to load PDF #{}: {}", position, err))
    })
}

/// Look up `key` on a page, walking up the /Parent chain.
pub(crate) fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = current.get(key) {
            return Some(value.clone());
        }
        let parent_id = current.get(b"Parent").ok()?.as_reference().ok()?;
        current = doc.get_dictionary(parent_id).ok()?;
    }
    None
}

/// /Count of a page tree node, following an indirect value.
fn page_tree_count(doc: &Document, pages_id: ObjectId) -> i64 {
    match doc.get_dictionary(pages_id).and_then(|pages| pages.get(b"Count")) {
        Ok(Object::Reference(id)) => doc.get_object(*id).and_then(Object::as_i64).unwrap_or(0),
        Ok(count) => count.as_i64().unwrap_or(0),
        Err(_) => 0,
    }
}

/// Deep-copy the page `page_id` of the copier's source into `target` and
/// append it to the end of the target's page tree.
fn append_page(
    copier: &mut ObjectCopier<'_>,
    target: &mut Document,
    page_id: ObjectId,
) -> Result<()> {
    let source = copier.source;
    let page = source.get_dictionary(page_id).map_err(|err| {
        DocmillError::Decode(format!("cannot read page object {:?}: {}", page_id, err))
    })?;

    // Inherited attributes live on the source's page tree, which is not
    // copied; make them explicit on the page itself.
    let mut page = page.clone();
    for key in INHERITABLE_KEYS {
        if !page.has(key) {
            if let Some(value) = inherited_attribute(source, page_id, key) {
                page.set(key.to_vec(), value);
            }
        }
    }

    let new_page_id = copier.reserve(target, page_id);
    let copied = copier.copy_dictionary(target, &page);
    target.objects.insert(new_page_id, Object::Dictionary(copied));

    let pages_id = target
        .catalog()
        .map_err(|err| DocmillError::Conversion(format!("no catalog: {}", err)))?
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|err| DocmillError::Conversion(format!("no /Pages reference: {}", err)))?;

    let count = page_tree_count(target, pages_id);
    let pages_dict = target
        .get_dictionary_mut(pages_id)
        .map_err(|err| DocmillError::Conversion(format!("unreadable /Pages: {}", err)))?;
    match pages_dict.get_mut(b"Kids") {
        Ok(Object::Array(kids)) => kids.push(Object::Reference(new_page_id)),
        _ => pages_dict.set("Kids", vec![Object::Reference(new_page_id)]),
    }
    pages_dict.set("Count", count + 1);

    if let Ok(page_dict) = target.get_dictionary_mut(new_page_id) {
        page_dict.set("Parent", Object::Reference(pages_id));
    }

    Ok(())
}

/// Copies objects from one document into another, following references.
///
/// Each source object is copied at most once; later references to it resolve
/// to the same target object. This keeps shared resources shared and breaks
/// reference cycles such as annotation /P back-links.
struct ObjectCopier<'a> {
    source: &'a Document,
    copied: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    fn new(source: &'a Document) -> Self {
        Self {
            source,
            copied: HashMap::new(),
        }
    }

    /// Allocate (or look up) the target ID for a source object.
    fn reserve(&mut self, target: &mut Document, source_id: ObjectId) -> ObjectId {
        *self
            .copied
            .entry(source_id)
            .or_insert_with(|| target.new_object_id())
    }

    fn copy_reference(&mut self, target: &mut Document, source_id: ObjectId) -> Object {
        if let Some(&existing) = self.copied.get(&source_id) {
            return Object::Reference(existing);
        }

        let source = self.source;
        let object = match source.get_object(source_id) {
            Ok(object) => object,
            Err(err) => {
                warn!(?source_id, %err, "Cannot resolve reference, using Null");
                return Object::Null;
            }
        };

        let new_id = self.reserve(target, source_id);
        let copied = self.copy_object(target, object);
        target.objects.insert(new_id, copied);
        Object::Reference(new_id)
    }

    fn copy_dictionary(&mut self, target: &mut Document, dict: &Dictionary) -> Dictionary {
        let mut new_dict = Dictionary::new();
        for (key, value) in dict.iter() {
            // Page tree nodes are never copied; append_page patches /Parent.
            if key == b"Parent" {
                continue;
            }
            new_dict.set(key.clone(), self.copy_object(target, value));
        }
        new_dict
    }

    fn copy_object(&mut self, target: &mut Document, object: &Object) -> Object {
        match object {
            Object::Reference(id) => self.copy_reference(target, *id),
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dictionary(target, dict)),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.copy_object(target, item))
                    .collect(),
            ),
            Object::Stream(stream) => {
                let dict = self.copy_dictionary(target, &stream.dict);
                let mut copied = lopdf::Stream::new(dict, stream.content.clone());
                copied.allows_compression = stream.allows_compression;
                Object::Stream(copied)
            }
            // Booleans, numbers, strings, names and null copy as-is.
            other => other.clone(),
        }
    }
}
