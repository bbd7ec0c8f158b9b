//! PDF text extraction using MuPDF
//!
//! Pulls the embedded text layer page by page and renders pages to PNG
//! for OCR when a document turns out to be scanned.
//!
//! MuPDF documents are not `Send`, so every operation opens a fresh
//! document inside a blocking task and drops it before returning.

use std::io::Cursor;
use std::path::Path;

use mupdf::{Colorspace, Document, Matrix, TextPageOptions};
use thiserror::Error;

/// PDF extraction errors
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to load PDF: {0}")]
    LoadError(String),
    #[error("Failed to render page {page}: {message}")]
    RenderError { page: usize, message: String },
    #[error("Image encoding error: {0}")]
    ImageError(String),
    #[error("MuPDF error: {0}")]
    MuPdfError(String),
    #[error("PDF worker task failed: {0}")]
    TaskFailed(String),
}

impl From<mupdf::Error> for PdfError {
    fn from(e: mupdf::Error) -> Self {
        PdfError::MuPdfError(e.to_string())
    }
}

/// Text pulled from a PDF's embedded text layer
#[derive(Debug, Clone, Default)]
pub struct PdfText {
    /// Text of each page, in page order
    pub pages: Vec<String>,
}

impl PdfText {
    /// All pages joined with blank lines, skipping empty pages
    pub fn joined(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Number of non-whitespace characters across all pages
    pub fn meaningful_chars(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|p| p.chars())
            .filter(|c| !c.is_whitespace())
            .count()
    }
}

/// Stateless MuPDF front end for the extraction pipeline
#[derive(Debug, Clone)]
pub struct PdfExtractor {
    render_scale: f32,
    max_pages: usize,
}

impl PdfExtractor {
    pub fn new(render_scale: f32, max_pages: usize) -> Self {
        Self {
            // Clamp scale to keep pixmaps bounded
            render_scale: render_scale.clamp(0.5, 4.0),
            max_pages: max_pages.max(1),
        }
    }

    /// Extract the embedded text layer of every page
    pub async fn extract_text(&self, path: &Path) -> Result<PdfText, PdfError> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || extract_text_blocking(&path))
            .await
            .map_err(|e| PdfError::TaskFailed(e.to_string()))?
    }

    /// Render pages to PNG images, up to the configured page limit
    pub async fn render_pages(&self, path: &Path) -> Result<Vec<Vec<u8>>, PdfError> {
        let path = path.to_path_buf();
        let scale = self.render_scale;
        let max_pages = self.max_pages;

        tokio::task::spawn_blocking(move || render_pages_blocking(&path, scale, max_pages))
            .await
            .map_err(|e| PdfError::TaskFailed(e.to_string()))?
    }
}

fn open_document(path: &Path) -> Result<Document, PdfError> {
    let path_str = path.to_string_lossy();
    Document::open(&*path_str)
        .map_err(|e| PdfError::LoadError(format!("{}: {}", path.display(), e)))
}

fn extract_text_blocking(path: &Path) -> Result<PdfText, PdfError> {
    let doc = open_document(path)?;
    let page_count = doc.page_count()? as usize;

    let mut pages = Vec::with_capacity(page_count);
    for index in 0..page_count {
        let page = doc.load_page(index as i32)?;
        let text_page = page.to_text_page(TextPageOptions::PRESERVE_WHITESPACE)?;
        pages.push(text_page.to_text()?);
    }

    tracing::debug!(path = %path.display(), pages = page_count, "Extracted PDF text layer");

    Ok(PdfText { pages })
}

fn render_pages_blocking(
    path: &Path,
    scale: f32,
    max_pages: usize,
) -> Result<Vec<Vec<u8>>, PdfError> {
    let doc = open_document(path)?;
    let page_count = doc.page_count()? as usize;

    if page_count > max_pages {
        tracing::warn!(
            path = %path.display(),
            pages = page_count,
            max_pages,
            "PDF exceeds OCR page limit, remaining pages skipped"
        );
    }

    let matrix = Matrix::new_scale(scale, scale);
    let colorspace = Colorspace::device_rgb();

    let mut images = Vec::with_capacity(page_count.min(max_pages));
    for index in 0..page_count.min(max_pages) {
        let page = doc.load_page(index as i32)?;
        let pixmap = page
            .to_pixmap(&matrix, &colorspace, false, true)
            .map_err(|e| PdfError::RenderError {
                page: index + 1,
                message: e.to_string(),
            })?;
        images.push(encode_png(&pixmap)?);
    }

    Ok(images)
}

/// Encode a pixmap as PNG
fn encode_png(pixmap: &mupdf::Pixmap) -> Result<Vec<u8>, PdfError> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize; // components per pixel

    let mut rgb_buffer = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let r = samples.get(offset).copied().unwrap_or(255);
            let g = samples.get(offset + 1).copied().unwrap_or(r);
            let b = samples.get(offset + 2).copied().unwrap_or(r);
            rgb_buffer.extend_from_slice(&[r, g, b]);
        }
    }

    let img = image::RgbImage::from_raw(width, height, rgb_buffer)
        .ok_or_else(|| PdfError::ImageError("Failed to create image buffer".to_string()))?;

    let mut output = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png)
        .map_err(|e| PdfError::ImageError(e.to_string()))?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joined_skips_blank_pages() {
        let text = PdfText {
            pages: vec!["  first page \n".into(), "   ".into(), "third".into()],
        };
        assert_eq!(text.joined(), "first page\n\nthird");
    }

    #[test]
    fn test_meaningful_chars_ignores_whitespace() {
        let text = PdfText {
            pages: vec!["a b\n".into(), "\t c".into()],
        };
        assert_eq!(text.meaningful_chars(), 3);
    }

    #[test]
    fn test_scale_is_clamped() {
        let extractor = PdfExtractor::new(100.0, 0);
        assert_eq!(extractor.render_scale, 4.0);
        assert_eq!(extractor.max_pages, 1);
    }

    #[tokio::test]
    async fn test_invalid_pdf_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let extractor = PdfExtractor::new(2.0, 10);
        assert!(extractor.extract_text(&path).await.is_err());
    }
}
