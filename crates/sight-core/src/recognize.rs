//! OCR path for scanned documents.
//!
//! One engine is created per document and reused for every page. The
//! [`EngineGuard`] releases it exactly once, whether the loop finishes or
//! bails out early.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use image::DynamicImage;

use sight_text::NoiseFilter;

use crate::error::{Result, SightError};
use crate::options::ReaderOptions;
use crate::plugin::{
    page_percent, Document, EngineFactory, Progress, Recognition, RecognitionEngine,
};
use crate::preprocess;
use crate::transcript::PageBlocks;

/// Scoped ownership of a recognition engine.
pub struct EngineGuard {
    engine: Option<Box<dyn RecognitionEngine>>,
}

impl EngineGuard {
    pub fn new(engine: Box<dyn RecognitionEngine>) -> Self {
        Self {
            engine: Some(engine),
        }
    }

    pub fn recognize(&mut self, image: &DynamicImage) -> Result<Recognition> {
        match self.engine.as_mut() {
            Some(engine) => engine.recognize(image),
            None => Err(SightError::Recognition("engine already released".to_string())),
        }
    }

    /// Release the engine now and surface any release error.
    pub fn finish(mut self) -> Result<()> {
        match self.engine.take() {
            Some(mut engine) => engine.release(),
            None => Ok(()),
        }
    }
}

impl Drop for EngineGuard {
    fn drop(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            log::debug!("Releasing recognition engine after early exit");
            if let Err(e) = engine.release() {
                log::warn!("Failed to release recognition engine: {}", e);
            }
        }
    }
}

/// Render, filter, recognize and clean every page in ascending order.
pub fn recognize_scanned(
    doc: &dyn Document,
    factory: &dyn EngineFactory,
    options: &ReaderOptions,
    filter: &NoiseFilter,
    progress: &Progress,
) -> Result<PageBlocks> {
    let total = doc.page_count();
    let scale = options.render_scale();
    log::info!(
        "Starting OCR with {} ({}) at scale {}",
        factory.name(),
        options.language,
        scale
    );

    // Engine callbacks land inside the slot of the page being recognized.
    let current_page = Arc::new(AtomicU32::new(1));
    let engine_progress = {
        let current_page = current_page.clone();
        let progress = progress.clone();
        Box::new(move |fraction: f64| {
            let page = current_page.load(Ordering::SeqCst);
            let done = f64::from(page.saturating_sub(1)) + fraction.clamp(0.0, 1.0);
            progress.report(
                page_percent(done, total),
                &format!("Reading: {:.0}%", fraction.clamp(0.0, 1.0) * 100.0),
            );
        })
    };

    let mut engine = EngineGuard::new(factory.create(&options.language, engine_progress)?);
    let mut blocks = PageBlocks::with_capacity(total as usize);

    for index in 1..=total {
        current_page.store(index, Ordering::SeqCst);

        let page = doc.page(index)?;
        let bitmap = preprocess::prepare_for_recognition(page.render(scale)?);
        let recognition = engine.recognize(&bitmap)?;
        log::debug!(
            "Page {}: {} chars recognized (confidence {:?})",
            index,
            recognition.text.len(),
            recognition.confidence
        );

        blocks.push(filter.apply(&recognition.text));
        progress.report(
            page_percent(f64::from(index), total),
            &format!("OCR page {}...", index),
        );
    }

    engine.finish()?;
    log::info!("Recognized {} page(s)", total);
    Ok(blocks)
}
