//! Document mode selection: selectable text or scanned images.
//!
//! Only page 1 is sampled. A document mixing scanned and text pages takes the
//! mode of its first page for every page.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::plugin::Document;

/// How text is recovered from a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentMode {
    /// Text tokens are embedded in the file; extract them directly.
    Selectable,
    /// Pages are images; recover text with OCR.
    Scanned,
}

impl fmt::Display for DocumentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentMode::Selectable => write!(f, "selectable"),
            DocumentMode::Scanned => write!(f, "scanned"),
        }
    }
}

/// Classify a document from the text tokens of its first page.
pub fn classify_document(doc: &dyn Document) -> Result<DocumentMode> {
    let first = doc.page(1)?;
    let tokens = first.text_tokens()?;

    let mode = if tokens.is_empty() {
        DocumentMode::Scanned
    } else {
        DocumentMode::Selectable
    };
    log::debug!("Page 1 has {} text token(s): {}", tokens.len(), mode);
    Ok(mode)
}
