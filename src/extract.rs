//! PDF text extraction.
//!
//! Pages are read one at a time with `lopdf` and joined with newlines in
//! page order. Pages that yield no text are skipped. When `lopdf` cannot
//! parse the file or finds no text on any page, `pdf-extract` gets a second
//! try, since it copes with some font encodings `lopdf` does not. It runs
//! on its own thread so a panic inside it becomes an extraction error.

use std::path::Path;
use std::thread;

use tracing::{debug, warn};

use crate::{Error, Result};

/// Turns a document on disk into plain text.
pub trait TextExtractor: Send + Sync {
    /// Extract all text, in reading order.
    fn extract(&self, path: &Path) -> Result<String>;
}

/// PDF extractor backed by `lopdf`, falling back to `pdf-extract`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    fn extract_pages(path: &Path) -> std::result::Result<String, lopdf::Error> {
        let doc = lopdf::Document::load(path)?;
        let pages = doc.get_pages();
        let mut texts = Vec::with_capacity(pages.len());

        for page_num in pages.keys() {
            match doc.extract_text(&[*page_num]) {
                Ok(text) if !text.trim().is_empty() => texts.push(text),
                Ok(_) => debug!(page = page_num, "page has no text"),
                Err(e) => warn!(page = page_num, error = %e, "failed to extract page text"),
            }
        }

        debug!(pages = pages.len(), with_text = texts.len(), "extracted pdf pages");
        Ok(texts.join("\n"))
    }
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        let primary = Self::extract_pages(path).map_err(|e| e.to_string());
        let owned = path.to_path_buf();
        first_with_text(path, primary, move || {
            pdf_extract::extract_text(&owned).map_err(|e| e.to_string())
        })
    }
}

/// Keep `primary` if it has text, else run `fallback` on its own thread.
///
/// A panic in `fallback` is reported as [`Error::Extraction`].
fn first_with_text<F>(
    path: &Path,
    primary: std::result::Result<String, String>,
    fallback: F,
) -> Result<String>
where
    F: FnOnce() -> std::result::Result<String, String> + Send + 'static,
{
    let reason = match primary {
        Ok(text) if !text.trim().is_empty() => return Ok(text),
        Ok(_) => "no page yielded text".to_string(),
        Err(e) => e,
    };
    warn!(path = %path.display(), reason = %reason, "lopdf extraction failed, trying pdf-extract");

    let fallback = thread::Builder::new()
        .name("pdf-extract".into())
        .spawn(fallback)
        .map_err(|e| format!("failed to spawn extraction thread: {e}"))
        .and_then(|handle| {
            handle
                .join()
                .unwrap_or_else(|_| Err("pdf-extract panicked".to_string()))
        });

    fallback.map_err(|fallback| Error::Extraction {
        path: path.to_path_buf(),
        message: format!("{reason}; fallback: {fallback}"),
    })
}
