//! OCR engines for scanned pages.

mod tesseract;

pub use tesseract::{TesseractEngine, TesseractFactory, DEFAULT_BINARY};
