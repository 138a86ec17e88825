//! Pipeline output types.

use serde::{Deserialize, Serialize};

use crate::classify::DocumentMode;

/// Separator appended after every page block.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Per-page text blocks in ascending page order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBlocks {
    blocks: Vec<String>,
}

impl PageBlocks {
    pub fn with_capacity(pages: usize) -> Self {
        Self {
            blocks: Vec::with_capacity(pages),
        }
    }

    /// Append the block for the next page.
    pub fn push(&mut self, block: impl Into<String>) {
        self.blocks.push(block.into());
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(String::as_str)
    }

    /// Each block followed by [`BLOCK_SEPARATOR`], empty blocks included.
    pub fn to_text(&self) -> String {
        let capacity = self
            .blocks
            .iter()
            .map(|b| b.len() + BLOCK_SEPARATOR.len())
            .sum();
        let mut text = String::with_capacity(capacity);
        for block in &self.blocks {
            text.push_str(block);
            text.push_str(BLOCK_SEPARATOR);
        }
        text
    }
}

/// The result of processing one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub source: String,
    pub mode: DocumentMode,
    pub page_count: u32,
    pub pages: PageBlocks,
    /// Accumulated page blocks before reflow.
    pub raw_text: String,
    /// Final text; reflowed when reflow is enabled, otherwise `raw_text`.
    pub text: String,
    pub reflowed: bool,
}
