//! Core of the PDF reader: document classification, per-page extraction or
//! OCR, and the pipeline that ties them together.

pub mod classify;
pub mod error;
pub mod extract;
pub mod options;
pub mod pipeline;
pub mod plugin;
pub mod preprocess;
pub mod recognize;
pub mod session;
pub mod transcript;

#[cfg(test)]
mod testing;

pub use classify::DocumentMode;
pub use error::{Result, SightError};
pub use options::{DeviceClass, DeviceProfile, DeviceSelection, ReaderOptions};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use plugin::{
    Document, DocumentLoader, EngineFactory, EngineProgress, Page, ProgressReporter,
    Recognition, RecognitionEngine,
};
pub use session::Session;
pub use transcript::{PageBlocks, Transcript};
