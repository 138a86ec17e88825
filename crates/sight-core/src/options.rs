//! Reader options shared across the pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use sight_text::{NoiseFilter, DEFAULT_MIN_ALPHA_RATIO, DEFAULT_NOISE_CHARS};

use crate::error::{Result, SightError};

/// User-agent fragments that mark a phone or tablet browser.
const MOBILE_UA_MARKERS: &[&str] = &["Mobi", "Android", "iPhone", "iPad"];

/// All options controlling one reader session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    // -- Recognition --
    /// Tesseract language code(s), e.g. `por` or `por+eng`.
    pub language: String,
    pub tesseract_path: Option<PathBuf>,
    pub device: DeviceProfile,
    /// Rasterization scale for compact devices (1.0 = 72 DPI).
    pub compact_scale: f32,
    pub standard_scale: f32,

    // -- Cleanup --
    pub noise_chars: String,
    pub noise_threshold: f64,
    /// Rejoin wrapped lines into paragraphs after extraction.
    pub reflow: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            language: "por".to_string(),
            tesseract_path: None,
            device: DeviceProfile::default(),
            compact_scale: 2.0,
            standard_scale: 3.0,
            noise_chars: DEFAULT_NOISE_CHARS.to_string(),
            noise_threshold: DEFAULT_MIN_ALPHA_RATIO,
            reflow: false,
        }
    }
}

impl ReaderOptions {
    /// Reject values that would make the pipeline misbehave rather than fail.
    pub fn validate(&self) -> Result<()> {
        if self.language.trim().is_empty() {
            return Err(SightError::Config("language must not be empty".to_string()));
        }
        if !(0.0..=1.0).contains(&self.noise_threshold) {
            return Err(SightError::Config(format!(
                "noise_threshold must be within 0.0..=1.0, got {}",
                self.noise_threshold
            )));
        }
        for (name, scale) in [
            ("compact_scale", self.compact_scale),
            ("standard_scale", self.standard_scale),
        ] {
            if !(scale > 0.0 && scale.is_finite()) {
                return Err(SightError::Config(format!(
                    "{} must be a positive number, got {}",
                    name, scale
                )));
            }
        }
        Ok(())
    }

    pub fn noise_filter(&self) -> NoiseFilter {
        NoiseFilter::new(self.noise_chars.clone(), self.noise_threshold)
    }

    /// Scale used to rasterize scanned pages on the configured device.
    pub fn render_scale(&self) -> f32 {
        match self.device.resolve() {
            DeviceClass::Compact => self.compact_scale,
            DeviceClass::Standard => self.standard_scale,
        }
    }
}

/// Coarse hardware class; decides the memory/accuracy tradeoff of OCR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceClass {
    Compact,
    Standard,
}

/// Device class selection; `Auto` derives it from the viewport and user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceSelection {
    #[default]
    Auto,
    Compact,
    Standard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceProfile {
    pub class: DeviceSelection,
    pub viewport_width: Option<u32>,
    pub user_agent: Option<String>,
    /// Viewports narrower than this count as compact.
    pub compact_viewport_max: u32,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            class: DeviceSelection::Auto,
            viewport_width: None,
            user_agent: None,
            compact_viewport_max: 768,
        }
    }
}

impl DeviceProfile {
    pub fn resolve(&self) -> DeviceClass {
        match self.class {
            DeviceSelection::Compact => DeviceClass::Compact,
            DeviceSelection::Standard => DeviceClass::Standard,
            DeviceSelection::Auto => {
                let narrow = self
                    .viewport_width
                    .map(|w| w < self.compact_viewport_max)
                    .unwrap_or(false);
                let mobile = self
                    .user_agent
                    .as_deref()
                    .map(|ua| MOBILE_UA_MARKERS.iter().any(|m| ua.contains(m)))
                    .unwrap_or(false);
                if narrow || mobile {
                    DeviceClass::Compact
                } else {
                    DeviceClass::Standard
                }
            }
        }
    }
}
