//! Direct text extraction for selectable documents.

use crate::error::Result;
use crate::plugin::{page_percent, Document, Progress};
use crate::transcript::PageBlocks;

/// Join each page's text tokens with single spaces, one block per page.
///
/// A failing page aborts the whole extraction.
pub fn extract_selectable(doc: &dyn Document, progress: &Progress) -> Result<PageBlocks> {
    let total = doc.page_count();
    let mut blocks = PageBlocks::with_capacity(total as usize);

    for index in 1..=total {
        let page = doc.page(index)?;
        let tokens = page.text_tokens()?;
        log::debug!("Page {}: {} token(s)", index, tokens.len());

        blocks.push(tokens.join(" "));
        progress.report(
            page_percent(f64::from(index), total),
            &format!("Extracting page {}...", index),
        );
    }

    log::info!("Extracted text from {} page(s)", total);
    Ok(blocks)
}
