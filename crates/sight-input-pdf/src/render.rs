//! Page rasterization via `pdftoppm` (poppler-utils).

use std::path::Path;
use std::process::Command;

use image::DynamicImage;

use sight_core::error::{Result, SightError};

const PDFTOPPM: &str = "pdftoppm";

/// Resolution of a page rendered at scale 1.0.
pub const BASE_DPI: f32 = 72.0;

/// Check that pdftoppm is available on the system.
pub fn check_pdftoppm() -> Result<()> {
    check_binary(PDFTOPPM)
}

/// Spawn `binary -v`; only a failed spawn means the tool is missing.
fn check_binary(binary: &str) -> Result<()> {
    match Command::new(binary).arg("-v").output() {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SightError::Render(
            "pdftoppm (poppler-utils) is required to rasterize scanned pages. \
             Install with: brew install poppler (macOS) or apt install poppler-utils (Linux)"
                .to_string(),
        )),
        Err(e) => Err(SightError::Render(format!(
            "Failed to check for {}: {}",
            binary, e
        ))),
    }
}

/// DPI handed to pdftoppm for a given viewport scale.
pub fn dpi_for_scale(scale: f32) -> u32 {
    ((BASE_DPI * scale).round() as u32).max(1)
}

/// Render a single 1-based page of `pdf_path` to a bitmap.
///
/// Callers run [`check_pdftoppm`] once before the first page.
pub fn render_page(pdf_path: &Path, page_num: u32, scale: f32) -> Result<DynamicImage> {
    let tmp_dir = tempfile::TempDir::new()
        .map_err(|e| SightError::Render(format!("Failed to create temp dir: {}", e)))?;
    let prefix = tmp_dir.path().join("page");
    let dpi = dpi_for_scale(scale);

    log::debug!("[pdftoppm] Rendering page {} at {} DPI", page_num, dpi);

    let output = Command::new(PDFTOPPM)
        .arg("-png")
        .arg("-r")
        .arg(dpi.to_string())
        .arg("-f")
        .arg(page_num.to_string())
        .arg("-l")
        .arg(page_num.to_string())
        .arg("-singlefile")
        .arg(pdf_path.as_os_str())
        .arg(prefix.as_os_str())
        .output()
        .map_err(|e| SightError::Render(format!("Failed to run pdftoppm: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SightError::Render(format!(
            "pdftoppm failed for page {}: {}",
            page_num,
            stderr.trim()
        )));
    }

    // -singlefile writes `<prefix>.png` without a page suffix.
    let png = prefix.with_extension("png");
    image::open(&png).map_err(|e| {
        SightError::Render(format!("Failed to read rendered page {}: {}", page_num, e))
    })
}
