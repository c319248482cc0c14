//! Per-page word extraction from paginated documents.
//!
//! Documents are loaded fully into memory with `lopdf` and walked in page
//! order. A page whose text cannot be extracted contributes an empty word list;
//! only a document that cannot be loaded at all is an error.

use std::path::Path;

use bibcloud_shared::{BibcloudError, Result};
use lopdf::Document;
use tracing::{debug, instrument, warn};

/// Split the text of every page of an in-memory document into words.
///
/// `origin` only labels errors and log entries.
#[instrument(skip_all, fields(origin = %origin.display(), bytes = bytes.len()))]
pub fn extract_page_words(bytes: &[u8], origin: &Path) -> Result<Vec<Vec<String>>> {
    let document = Document::load_mem(bytes)
        .map_err(|e| BibcloudError::document(origin, format!("failed to load: {e}")))?;

    let pages = document.get_pages();
    let mut word_lists = Vec::with_capacity(pages.len());

    for &page_number in pages.keys() {
        let words = match document.extract_text(&[page_number]) {
            Ok(text) => text.split_whitespace().map(String::from).collect::<Vec<_>>(),
            Err(e) => {
                warn!(page = page_number, error = %e, "no extractable text on page");
                Vec::new()
            }
        };
        debug!(page = page_number, words = words.len(), "extracted page");
        word_lists.push(words);
    }

    Ok(word_lists)
}
