//! Text passes applied to extracted or recognized page text.
//!
//! Both passes are pure `&str -> String` functions:
//!  1. [`noise::NoiseFilter`] strips OCR artifacts and low-signal lines.
//!  2. [`reflow::reflow`] rejoins hard-wrapped lines into paragraphs.

pub mod noise;
pub mod reflow;

pub use noise::{NoiseFilter, DEFAULT_MIN_ALPHA_RATIO, DEFAULT_NOISE_CHARS};
pub use reflow::reflow;
