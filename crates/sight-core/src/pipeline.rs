//! Pipeline orchestrator: runs one document from bytes to text.
//!
//! Progress runs on a 0-100 scale:
//!   0-30:   read the file, open it, sample page 1 for the document mode
//!   30-90:  per-page extraction or recognition
//!   90-100: optional reflow, store the transcript

use log::info;

use sight_text::reflow;

use crate::classify::{classify_document, DocumentMode};
use crate::error::{Result, SightError};
use crate::extract::extract_selectable;
use crate::plugin::{DocumentLoader, EngineFactory, Progress, ProgressReporter, PAGES_START};
use crate::recognize::recognize_scanned;
use crate::session::Session;
use crate::transcript::Transcript;

/// PDF readers accept the header anywhere in the first kilobyte.
const HEADER_WINDOW: usize = 1024;

/// The document reader pipeline.
pub struct Pipeline {
    loader: Box<dyn DocumentLoader>,
    engine_factory: Box<dyn EngineFactory>,
    progress: Progress,
}

impl Pipeline {
    pub fn new(loader: Box<dyn DocumentLoader>, engine_factory: Box<dyn EngineFactory>) -> Self {
        Self {
            loader,
            engine_factory,
            progress: Progress::default(),
        }
    }

    /// Set a progress reporter callback.
    pub fn set_progress_reporter(&mut self, reporter: ProgressReporter) {
        self.progress = Progress::new(Some(reporter));
    }

    /// Process one document and store the result in `session`.
    ///
    /// Every failure aborts the run; the session keeps its previous transcript.
    pub fn process(&self, session: &mut Session, source: &str, bytes: &[u8]) -> Result<Transcript> {
        let options = session.options().clone();
        options.validate()?;
        validate_input(bytes)?;

        self.progress.report(10.0, "Reading file...");
        info!("Opening {} with {} loader", source, self.loader.name());
        let doc = self.loader.open(bytes)?;

        let page_count = doc.page_count();
        if page_count == 0 {
            return Err(SightError::UnsupportedInput(format!(
                "{} has no pages",
                source
            )));
        }
        info!("{} has {} page(s)", source, page_count);
        self.progress.report(PAGES_START, "Analyzing page structure...");

        let mode = classify_document(doc.as_ref())?;
        let pages = match mode {
            DocumentMode::Selectable => {
                info!("Selectable PDF detected, extracting text directly");
                extract_selectable(doc.as_ref(), &self.progress)?
            }
            DocumentMode::Scanned => {
                info!("Scanned PDF detected, starting OCR");
                recognize_scanned(
                    doc.as_ref(),
                    self.engine_factory.as_ref(),
                    &options,
                    &options.noise_filter(),
                    &self.progress,
                )?
            }
        };

        let raw_text = pages.to_text();
        let text = if options.reflow {
            self.progress.report(95.0, "Reflowing paragraphs...");
            reflow(&raw_text)
        } else {
            raw_text.clone()
        };

        let transcript = Transcript {
            source: source.to_string(),
            mode,
            page_count,
            pages,
            raw_text,
            text,
            reflowed: options.reflow,
        };
        session.store(transcript.clone());

        self.progress.report(100.0, "Processing finished.");
        info!(
            "Processed {} ({} mode, {} chars)",
            source,
            mode,
            transcript.text.len()
        );
        Ok(transcript)
    }
}

/// Reject empty and non-PDF input before any backend sees it.
pub fn validate_input(bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        return Err(SightError::UnsupportedInput("file is empty".to_string()));
    }
    let window = &bytes[..bytes.len().min(HEADER_WINDOW)];
    if !window.windows(5).any(|w| w == b"%PDF-") {
        return Err(SightError::UnsupportedInput(
            "only PDF files are supported".to_string(),
        ));
    }
    Ok(())
}

/// Builder for constructing a pipeline.
pub struct PipelineBuilder {
    loader: Option<Box<dyn DocumentLoader>>,
    engine_factory: Option<Box<dyn EngineFactory>>,
    progress_reporter: Option<ProgressReporter>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            loader: None,
            engine_factory: None,
            progress_reporter: None,
        }
    }

    pub fn loader(mut self, loader: Box<dyn DocumentLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn engine_factory(mut self, factory: Box<dyn EngineFactory>) -> Self {
        self.engine_factory = Some(factory);
        self
    }

    pub fn progress_reporter(mut self, reporter: ProgressReporter) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    pub fn build(self) -> Result<Pipeline> {
        let loader = self
            .loader
            .ok_or_else(|| SightError::Pipeline("No document loader specified".to_string()))?;
        let engine_factory = self
            .engine_factory
            .ok_or_else(|| SightError::Pipeline("No recognition engine specified".to_string()))?;

        let mut pipeline = Pipeline::new(loader, engine_factory);
        if let Some(reporter) = self.progress_reporter {
            pipeline.set_progress_reporter(reporter);
        }
        Ok(pipeline)
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
