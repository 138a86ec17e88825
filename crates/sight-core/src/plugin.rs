//! Collaborator traits: document backends, recognition engines, progress.

use std::sync::Arc;

use image::DynamicImage;

use crate::error::Result;

/// Progress reporter callback: `(percent 0..=100, status message)`.
pub type ProgressReporter = Arc<dyn Fn(f64, &str) + Send + Sync>;

/// Engine-side progress within the page being recognized, `0.0..=1.0`.
pub type EngineProgress = Box<dyn Fn(f64) + Send + Sync>;

/// Opens raw bytes as a paginated document.
pub trait DocumentLoader: Send + Sync {
    /// Human-readable name of this backend.
    fn name(&self) -> &str;

    fn open(&self, bytes: &[u8]) -> Result<Box<dyn Document>>;
}

/// A loaded paginated document. Page indices are 1-based.
pub trait Document {
    fn page_count(&self) -> u32;

    fn page(&self, index: u32) -> Result<Box<dyn Page + '_>>;
}

pub trait Page {
    /// Machine-readable text runs in content order. Empty for image-only pages.
    fn text_tokens(&self) -> Result<Vec<String>>;

    /// Rasterize the page; `scale` 1.0 corresponds to 72 DPI.
    fn render(&self, scale: f32) -> Result<DynamicImage>;
}

/// Raw engine output for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recognition {
    pub text: String,
    /// Mean confidence in `0.0..=100.0`, when the engine reports one.
    pub confidence: Option<f32>,
}

/// A live recognition engine bound to one language.
pub trait RecognitionEngine {
    fn recognize(&mut self, image: &DynamicImage) -> Result<Recognition>;

    /// Free engine resources. Called exactly once, after the last page.
    fn release(&mut self) -> Result<()>;
}

/// Creates recognition engines; one engine serves one whole document.
pub trait EngineFactory: Send + Sync {
    fn name(&self) -> &str;

    fn create(&self, language: &str, progress: EngineProgress)
        -> Result<Box<dyn RecognitionEngine>>;
}

/// Percent reached once the file is read and its structure analyzed.
pub const PAGES_START: f64 = 30.0;

/// Share of the progress bar covered by the page loop.
pub const PAGES_SPAN: f64 = 60.0;

/// Percent after `pages_done` (possibly fractional) of `total` pages.
pub fn page_percent(pages_done: f64, total: u32) -> f64 {
    PAGES_START + (pages_done / f64::from(total.max(1))) * PAGES_SPAN
}

/// Optional progress sink threaded through the pipeline stages.
#[derive(Clone, Default)]
pub struct Progress {
    reporter: Option<ProgressReporter>,
}

impl Progress {
    pub fn new(reporter: Option<ProgressReporter>) -> Self {
        Self { reporter }
    }

    pub fn report(&self, percent: f64, message: &str) {
        if let Some(ref reporter) = self.reporter {
            reporter(percent.clamp(0.0, 100.0), message);
        }
    }
}
