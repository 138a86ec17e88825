//! Recognition through the `tesseract` command-line engine.
//!
//! Each engine owns a private temp workspace where page bitmaps are written
//! as PNG before tesseract reads them back. Releasing the engine removes the
//! workspace.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::{DynamicImage, ImageFormat};
use tempfile::TempDir;

use sight_core::error::{Result, SightError};
use sight_core::plugin::{EngineFactory, EngineProgress, Recognition, RecognitionEngine};

/// Binary looked up on `PATH` when none is configured.
pub const DEFAULT_BINARY: &str = "tesseract";

pub struct TesseractFactory {
    binary: PathBuf,
}

impl TesseractFactory {
    pub fn new(binary: Option<PathBuf>) -> Self {
        Self {
            binary: binary.unwrap_or_else(|| PathBuf::from(DEFAULT_BINARY)),
        }
    }

    /// Run `tesseract --version` and return its first output line.
    pub fn check(&self) -> Result<String> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .map_err(|e| {
                SightError::Recognition(format!(
                    "tesseract is required to read scanned pages ({}): {}. \
                     Install with: brew install tesseract (macOS) or apt install tesseract-ocr (Linux)",
                    self.binary.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SightError::Recognition(format!(
                "{} --version failed: {}",
                self.binary.display(),
                stderr.trim()
            )));
        }

        // Older releases print the banner on stderr.
        let banner = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };
        Ok(String::from_utf8_lossy(&banner)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string())
    }
}

impl Default for TesseractFactory {
    fn default() -> Self {
        Self::new(None)
    }
}

impl EngineFactory for TesseractFactory {
    fn name(&self) -> &str {
        "Tesseract"
    }

    fn create(
        &self,
        language: &str,
        progress: EngineProgress,
    ) -> Result<Box<dyn RecognitionEngine>> {
        let version = self.check()?;
        log::info!("Using {} with language '{}'", version, language);
        Ok(Box::new(TesseractEngine::new(
            self.binary.clone(),
            language,
            progress,
        )?))
    }
}

pub struct TesseractEngine {
    binary: PathBuf,
    language: String,
    progress: EngineProgress,
    workspace: Option<TempDir>,
    pages_seen: u32,
}

impl TesseractEngine {
    pub fn new(binary: PathBuf, language: &str, progress: EngineProgress) -> Result<Self> {
        let workspace = tempfile::Builder::new().prefix("sight-ocr").tempdir()?;
        log::debug!("OCR workspace at {}", workspace.path().display());
        Ok(Self {
            binary,
            language: language.to_string(),
            progress,
            workspace: Some(workspace),
            pages_seen: 0,
        })
    }

    /// Workspace directory, or `None` once released.
    pub fn workspace(&self) -> Option<&Path> {
        self.workspace.as_ref().map(TempDir::path)
    }

    fn run(&self, png: &Path) -> Result<String> {
        let output = Command::new(&self.binary)
            .arg(png)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .map_err(|e| SightError::Recognition(format!("Failed to run tesseract: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SightError::Recognition(format!(
                "tesseract failed: {}",
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl RecognitionEngine for TesseractEngine {
    fn recognize(&mut self, image: &DynamicImage) -> Result<Recognition> {
        let dir = self
            .workspace
            .as_ref()
            .ok_or_else(|| SightError::Recognition("engine already released".to_string()))?
            .path()
            .to_path_buf();

        self.pages_seen += 1;
        (self.progress)(0.0);

        let png = dir.join(format!("page-{:04}.png", self.pages_seen));
        image
            .save_with_format(&png, ImageFormat::Png)
            .map_err(|e| SightError::Recognition(format!("Failed to write page bitmap: {}", e)))?;

        let result = self.run(&png);
        if let Err(e) = std::fs::remove_file(&png) {
            log::debug!("Could not remove {}: {}", png.display(), e);
        }
        let text = result?;

        (self.progress)(1.0);
        Ok(Recognition {
            text,
            confidence: None,
        })
    }

    fn release(&mut self) -> Result<()> {
        if let Some(dir) = self.workspace.take() {
            log::debug!("Removing OCR workspace {}", dir.path().display());
            dir.close()?;
        }
        Ok(())
    }
}
