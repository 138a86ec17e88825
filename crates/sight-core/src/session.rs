//! Per-user reader state, passed explicitly into each pipeline run.

use crate::options::ReaderOptions;
use crate::transcript::Transcript;

/// Options plus the transcript of the last processed document.
///
/// Independent sessions never share state, so several documents (or tests)
/// can be processed side by side.
#[derive(Debug, Clone, Default)]
pub struct Session {
    options: ReaderOptions,
    transcript: Option<Transcript>,
}

impl Session {
    pub fn new(options: ReaderOptions) -> Self {
        Self {
            options,
            transcript: None,
        }
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ReaderOptions {
        &mut self.options
    }

    pub fn transcript(&self) -> Option<&Transcript> {
        self.transcript.as_ref()
    }

    /// Final text of the last processed document.
    pub fn current_text(&self) -> Option<&str> {
        self.transcript.as_ref().map(|t| t.text.as_str())
    }

    pub(crate) fn store(&mut self, transcript: Transcript) {
        self.transcript = Some(transcript);
    }

    /// Forget the last document; options are kept.
    pub fn reset(&mut self) {
        if self.transcript.take().is_some() {
            log::info!("Session reset; ready for a new document");
        }
    }
}
