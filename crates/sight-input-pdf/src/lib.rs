//! PDF document backend: text tokens through `lopdf`, rasterization through
//! `pdftoppm`.

mod render;

use std::io::Write;

use image::DynamicImage;
use once_cell::unsync::OnceCell;
use tempfile::NamedTempFile;

use sight_core::error::{Result, SightError};
use sight_core::plugin::{Document, DocumentLoader, Page};

pub use render::{check_pdftoppm, dpi_for_scale};

pub struct PdfLoader;

impl DocumentLoader for PdfLoader {
    fn name(&self) -> &str {
        "PDF"
    }

    fn open(&self, bytes: &[u8]) -> Result<Box<dyn Document>> {
        Ok(Box::new(PdfDocument::load(bytes)?))
    }
}

/// A parsed PDF plus the raw bytes, spilled to disk on first render.
pub struct PdfDocument {
    doc: lopdf::Document,
    page_numbers: Vec<u32>,
    bytes: Vec<u8>,
    spill: OnceCell<NamedTempFile>,
}

impl PdfDocument {
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let doc = lopdf::Document::load_mem(bytes)
            .map_err(|e| SightError::Pdf(format!("Failed to load PDF: {}", e)))?;
        if doc.is_encrypted() {
            return Err(SightError::Pdf(
                "PDF is password-protected".to_string(),
            ));
        }

        // get_pages is keyed by page number, already in ascending order.
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        log::info!("PDF has {} pages (version {})", page_numbers.len(), doc.version);

        Ok(Self {
            doc,
            page_numbers,
            bytes: bytes.to_vec(),
            spill: OnceCell::new(),
        })
    }

    /// Check for pdftoppm and spill the bytes to disk, once per document.
    fn spilled_path(&self) -> Result<&std::path::Path> {
        let file = self.spill.get_or_try_init(|| -> Result<NamedTempFile> {
            check_pdftoppm()?;
            let mut file = tempfile::Builder::new().suffix(".pdf").tempfile()?;
            file.write_all(&self.bytes)?;
            file.flush()?;
            Ok(file)
        })?;
        Ok(file.path())
    }
}

impl Document for PdfDocument {
    fn page_count(&self) -> u32 {
        self.page_numbers.len() as u32
    }

    fn page(&self, index: u32) -> Result<Box<dyn Page + '_>> {
        let number = index
            .checked_sub(1)
            .and_then(|i| self.page_numbers.get(i as usize))
            .copied()
            .ok_or_else(|| {
                SightError::Pdf(format!(
                    "page {} out of range (document has {})",
                    index,
                    self.page_numbers.len()
                ))
            })?;
        Ok(Box::new(PdfPage { doc: self, number }))
    }
}

pub struct PdfPage<'a> {
    doc: &'a PdfDocument,
    number: u32,
}

impl Page for PdfPage<'_> {
    fn text_tokens(&self) -> Result<Vec<String>> {
        let text = self.doc.doc.extract_text(&[self.number]).map_err(|e| {
            SightError::Pdf(format!("Failed to extract text from page {}: {}", self.number, e))
        })?;
        Ok(text_tokens(&text))
    }

    fn render(&self, scale: f32) -> Result<DynamicImage> {
        let path = self.doc.spilled_path()?;
        render::render_page(path, self.number, scale)
    }
}

/// Non-empty trimmed lines of extracted page text.
fn text_tokens(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a PDF with one page per entry; `None` makes an image-free blank page.
    fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let operations = match text {
                Some(text) => vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
                None => vec![],
            };
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_text_tokens_trim_and_skip_blank_lines() {
        assert_eq!(
            text_tokens("  Olá mundo \n\n\t\nsegunda linha\n"),
            vec!["Olá mundo".to_string(), "segunda linha".to_string()]
        );
        assert!(text_tokens(" \n \n").is_empty());
    }

    #[test]
    fn test_open_counts_pages() {
        let bytes = build_pdf(&[Some("Hello"), None, Some("World")]);
        let doc = PdfLoader.open(&bytes).unwrap();
        assert_eq!(doc.page_count(), 3);
    }

    #[test]
    fn test_page_tokens() {
        let bytes = build_pdf(&[Some("Hello World"), None]);
        let doc = PdfLoader.open(&bytes).unwrap();

        let first = doc.page(1).unwrap().text_tokens().unwrap();
        assert!(first.join(" ").contains("Hello World"));

        let blank = doc.page(2).unwrap().text_tokens().unwrap();
        assert!(blank.is_empty());
    }

    #[test]
    fn test_page_index_out_of_range() {
        let bytes = build_pdf(&[Some("only")]);
        let doc = PdfLoader.open(&bytes).unwrap();
        assert!(matches!(doc.page(0), Err(SightError::Pdf(_))));
        assert!(matches!(doc.page(2), Err(SightError::Pdf(_))));
    }

    #[test]
    fn test_garbage_is_a_pdf_error() {
        let err = PdfLoader.open(b"%PDF-1.4\nnot really a pdf");
        assert!(matches!(err, Err(SightError::Pdf(_))));
    }

    #[test]
    fn test_spill_happens_once_per_document() {
        if check_pdftoppm().is_err() {
            return;
        }
        let bytes = build_pdf(&[Some("a"), Some("b")]);
        let doc = PdfDocument::load(&bytes).unwrap();

        let first = doc.spilled_path().unwrap().to_path_buf();
        let second = doc.spilled_path().unwrap().to_path_buf();
        assert_eq!(first, second);
        assert_eq!(std::fs::read(&first).unwrap(), bytes);
    }

    #[test]
    fn test_render_page_when_pdftoppm_available() {
        if check_pdftoppm().is_err() {
            return;
        }
        let bytes = build_pdf(&[Some("Render me")]);
        let doc = PdfLoader.open(&bytes).unwrap();
        let image = doc.page(1).unwrap().render(1.0).unwrap();
        // A4 at 72 DPI.
        assert_eq!((image.width(), image.height()), (595, 842));
    }
}
