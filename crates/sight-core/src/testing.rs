//! In-memory collaborators for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use image::DynamicImage;

use crate::error::{Result, SightError};
use crate::plugin::{
    Document, DocumentLoader, EngineFactory, EngineProgress, Page, Recognition,
    RecognitionEngine,
};

#[derive(Debug, Clone)]
pub struct FakePage {
    tokens: Vec<String>,
    broken: bool,
}

impl FakePage {
    pub fn text(tokens: &[&str]) -> Self {
        Self {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            broken: false,
        }
    }

    pub fn scanned() -> Self {
        Self {
            tokens: Vec::new(),
            broken: false,
        }
    }

    /// Fails both token extraction and rendering.
    pub fn failing() -> Self {
        Self {
            tokens: Vec::new(),
            broken: true,
        }
    }
}

pub struct FakeDocument {
    pages: Vec<FakePage>,
    /// `(page index, scale)` for every render call, in call order.
    pub renders: Arc<Mutex<Vec<(u32, f32)>>>,
}

impl FakeDocument {
    pub fn new(pages: Vec<FakePage>) -> Self {
        Self {
            pages,
            renders: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Document for FakeDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, index: u32) -> Result<Box<dyn Page + '_>> {
        let page = index
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .ok_or_else(|| SightError::Pdf(format!("page {} out of range", index)))?;
        Ok(Box::new(FakePageHandle {
            index,
            page,
            renders: &self.renders,
        }))
    }
}

struct FakePageHandle<'a> {
    index: u32,
    page: &'a FakePage,
    renders: &'a Mutex<Vec<(u32, f32)>>,
}

impl Page for FakePageHandle<'_> {
    fn text_tokens(&self) -> Result<Vec<String>> {
        if self.page.broken {
            return Err(SightError::Pdf(format!("page {} is corrupt", self.index)));
        }
        Ok(self.page.tokens.clone())
    }

    fn render(&self, scale: f32) -> Result<DynamicImage> {
        if self.page.broken {
            return Err(SightError::Render(format!("page {} is corrupt", self.index)));
        }
        self.renders.lock().unwrap().push((self.index, scale));
        Ok(DynamicImage::new_rgb8(4, 4))
    }
}

pub struct FakeLoader {
    pub pages: Vec<FakePage>,
    pub opened: Arc<AtomicUsize>,
}

impl FakeLoader {
    pub fn new(pages: Vec<FakePage>) -> Self {
        Self {
            pages,
            opened: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl DocumentLoader for FakeLoader {
    fn name(&self) -> &str {
        "Fake"
    }

    fn open(&self, bytes: &[u8]) -> Result<Box<dyn Document>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        if bytes.ends_with(b"%%BROKEN") {
            return Err(SightError::Pdf("failed to parse xref table".to_string()));
        }
        Ok(Box::new(FakeDocument::new(self.pages.clone())))
    }
}

/// Hands out engines that return `outputs` in order; `None` fails that call.
pub struct FakeFactory {
    outputs: Mutex<VecDeque<Option<String>>>,
    pub created: Arc<AtomicUsize>,
    pub released: Arc<AtomicUsize>,
    pub languages: Arc<Mutex<Vec<String>>>,
}

impl FakeFactory {
    pub fn new(outputs: Vec<Option<&str>>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into_iter().map(|o| o.map(str::to_string)).collect()),
            created: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
            languages: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn texts(outputs: &[&str]) -> Self {
        Self::new(outputs.iter().map(|o| Some(*o)).collect())
    }
}

impl EngineFactory for FakeFactory {
    fn name(&self) -> &str {
        "Fake"
    }

    fn create(
        &self,
        language: &str,
        progress: EngineProgress,
    ) -> Result<Box<dyn RecognitionEngine>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.languages.lock().unwrap().push(language.to_string());
        let outputs: VecDeque<Option<String>> = self.outputs.lock().unwrap().drain(..).collect();
        Ok(Box::new(FakeEngine {
            outputs,
            progress,
            released: self.released.clone(),
        }))
    }
}

struct FakeEngine {
    outputs: VecDeque<Option<String>>,
    progress: EngineProgress,
    released: Arc<AtomicUsize>,
}

impl RecognitionEngine for FakeEngine {
    fn recognize(&mut self, _image: &DynamicImage) -> Result<Recognition> {
        (self.progress)(0.5);
        match self.outputs.pop_front() {
            Some(Some(text)) => Ok(Recognition {
                text,
                confidence: Some(91.0),
            }),
            Some(None) => Err(SightError::Recognition("engine crashed".to_string())),
            None => Err(SightError::Recognition("no output queued".to_string())),
        }
    }

    fn release(&mut self) -> Result<()> {
        self.released.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
