//! Extraction-translation pipeline
//!
//! Turns an uploaded file into original text, a detected language and an
//! English translation. [`ExtractionPipeline::extract`] never returns an
//! error: failures are folded into the result.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use super::types::{ExtractError, ExtractionResult, FileKind};
use crate::config::{OcrConfig, TranslationConfig};
use crate::ocr::OcrService;
use crate::pdf::PdfExtractor;
use crate::translate::{detect_language_code, Translator};

pub struct ExtractionPipeline {
    ocr: Arc<OcrService>,
    pdf: PdfExtractor,
    translator: Arc<dyn Translator>,
    translation: TranslationConfig,
    pdf_min_text_chars: usize,
}

impl ExtractionPipeline {
    pub fn new(
        ocr: Arc<OcrService>,
        translator: Arc<dyn Translator>,
        ocr_config: &OcrConfig,
        translation: TranslationConfig,
    ) -> Self {
        Self {
            ocr,
            pdf: PdfExtractor::new(ocr_config.pdf_render_scale, ocr_config.pdf_max_pages),
            translator,
            translation,
            pdf_min_text_chars: ocr_config.pdf_min_text_chars,
        }
    }

    /// Extract, detect and translate; failures are reported in the result
    pub async fn extract(&self, path: &Path) -> ExtractionResult {
        match self.try_extract(path).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(path = %path.display(), "Extraction failed: {}", e);
                ExtractionResult::failed(e.to_string())
            }
        }
    }

    async fn try_extract(&self, path: &Path) -> Result<ExtractionResult, ExtractError> {
        let start = Instant::now();

        let kind = FileKind::from_path(path)
            .ok_or_else(|| ExtractError::UnsupportedFileType(path.display().to_string()))?;

        let original_text = match kind {
            FileKind::Image => self.ocr.recognize_file(path).await?.text,
            FileKind::Pdf => self.extract_pdf(path).await?,
            FileKind::Text => read_text(path).await?,
        };

        if original_text.trim().is_empty() {
            tracing::info!(path = %path.display(), "No text found in document");
            return Ok(ExtractionResult::empty(start.elapsed().as_secs_f64()));
        }

        let language = detect_language_code(&original_text);
        tracing::debug!(path = %path.display(), language = %language, "Detected language");

        let translated_text = if self.needs_translation(&language) {
            self.translator
                .translate(
                    &original_text,
                    &self.translation.source_lang,
                    &self.translation.target_lang,
                )
                .await?
        } else {
            original_text.clone()
        };

        let confidence = if language == "ml" || language == "en" {
            0.9
        } else {
            0.5
        };

        Ok(ExtractionResult {
            original_text,
            language,
            translated_text,
            processing_time: start.elapsed().as_secs_f64(),
            confidence,
            error: None,
        })
    }

    /// Languages listed in config are translated; everything else is
    /// assumed to already be in the target language
    fn needs_translation(&self, language: &str) -> bool {
        self.translation
            .translate_languages
            .iter()
            .any(|l| l == language)
    }

    /// Embedded text first, page OCR when the text layer is too thin
    async fn extract_pdf(&self, path: &Path) -> Result<String, ExtractError> {
        let text = self.pdf.extract_text(path).await?;

        if text.meaningful_chars() >= self.pdf_min_text_chars {
            tracing::debug!(path = %path.display(), pages = text.pages.len(), "Using embedded PDF text");
            return Ok(text.joined());
        }

        tracing::info!(
            path = %path.display(),
            chars = text.meaningful_chars(),
            "PDF has no usable text layer, running OCR on rendered pages"
        );

        let pages = self.pdf.render_pages(path).await?;
        Ok(self.ocr.recognize_pages(&pages).await?)
    }
}

async fn read_text(path: &Path) -> Result<String, ExtractError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ExtractError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ocr::MockProvider;
    use crate::translate::MockTranslator;

    const MALAYALAM: &str = "കൊച്ചി മെട്രോ റെയിൽ ലിമിറ്റഡ് ട്രെയിൻ സർവീസുകൾ നാളെ രാവിലെ ആറു മണിക്ക് ആരംഭിക്കും";
    const ENGLISH: &str = "The depot will inspect every trainset before the morning induction \
                           and report defects to the operations control centre.";

    fn pipeline(ocr_text: &str, translator_fails: bool) -> ExtractionPipeline {
        let config = Config::default();
        let ocr = OcrService::with_providers("mal", vec![Arc::new(MockProvider::returning(ocr_text))]);
        ExtractionPipeline::new(
            Arc::new(ocr),
            Arc::new(MockTranslator {
                fail: translator_fails,
            }),
            &config.ocr,
            config.translation,
        )
    }

    fn pipeline_with(ocr: Arc<MockProvider>) -> ExtractionPipeline {
        let config = Config::default();
        let provider: Arc<dyn crate::ocr::OcrProviderTrait> = ocr;
        let ocr = OcrService::with_providers("mal", vec![provider]);
        ExtractionPipeline::new(
            Arc::new(ocr),
            Arc::new(MockTranslator { fail: false }),
            &config.ocr,
            config.translation,
        )
    }

    /// Single-page PDF whose page draws `content` with Helvetica as /F1
    fn single_page_pdf(content: &str) -> Vec<u8> {
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
             /Resources << /Font << /F1 5 0 R >> >> >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                content.len(),
                content
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (index, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", index + 1, body).as_bytes());
        }

        let xref_offset = pdf.len();
        pdf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
        for offset in offsets {
            pdf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        pdf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref_offset
            )
            .as_bytes(),
        );

        pdf
    }

    fn write(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_english_text_is_not_translated() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "notice.txt", ENGLISH.as_bytes());

        let result = pipeline("", false).extract(&path).await;

        assert!(result.error.is_none());
        assert_ne!(result.language, "ml");
        assert_eq!(result.translated_text, result.original_text);
    }

    #[tokio::test]
    async fn test_malayalam_text_is_translated() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "notice.txt", MALAYALAM.as_bytes());

        let result = pipeline("", false).extract(&path).await;

        assert_eq!(result.language, "ml");
        assert_eq!(result.confidence, 0.9);
        assert_eq!(result.translated_text, format!("[ml->en] {}", MALAYALAM));
    }

    #[tokio::test]
    async fn test_image_goes_through_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "scan.PNG", b"\x89PNG fake");

        let result = pipeline(MALAYALAM, false).extract(&path).await;

        assert_eq!(result.original_text, MALAYALAM);
        assert_eq!(result.language, "ml");
    }

    #[tokio::test]
    async fn test_blank_ocr_output_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "blank.jpg", b"jpeg");

        let result = pipeline("  \n ", false).extract(&path).await;

        assert_eq!(result.language, "unknown");
        assert_eq!(result.confidence, 0.0);
        assert!(result.original_text.is_empty());
        assert!(result.translated_text.is_empty());
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_translation_failure_is_reported_in_band() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "notice.txt", MALAYALAM.as_bytes());

        let result = pipeline("", true).extract(&path).await;

        assert_eq!(result.language, "error");
        assert!(result.translated_text.starts_with("Processing error:"));
        assert!(result.error.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_pdf_text_layer_is_used_without_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = single_page_pdf(
            "BT /F1 12 Tf 72 720 Td \
             (Trainset 12 passed the overnight brake inspection and is cleared for revenue service) Tj ET",
        );
        let path = write(&dir, "report.pdf", &pdf);
        let ocr = Arc::new(MockProvider::returning(MALAYALAM));

        let result = pipeline_with(Arc::clone(&ocr)).extract(&path).await;

        assert!(result.error.is_none(), "{:?}", result.error);
        assert!(result.original_text.contains("brake inspection"));
        assert_eq!(result.translated_text, result.original_text);
        assert_eq!(ocr.call_count(), 0);
    }

    #[tokio::test]
    async fn test_scanned_pdf_falls_back_to_page_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = single_page_pdf("0.2 0.2 0.8 rg 100 100 200 200 re f");
        let path = write(&dir, "scan.pdf", &pdf);
        let ocr = Arc::new(MockProvider::returning(MALAYALAM));

        let result = pipeline_with(Arc::clone(&ocr)).extract(&path).await;

        assert!(result.error.is_none(), "{:?}", result.error);
        assert_eq!(ocr.call_count(), 1);
        assert_eq!(result.original_text, MALAYALAM);
        assert_eq!(result.language, "ml");
        assert_eq!(result.translated_text, format!("[ml->en] {}", MALAYALAM));
    }

    #[tokio::test]
    async fn test_never_fails_for_supported_extensions() {
        let pipeline = pipeline("text", false);
        for ext in crate::extract::SUPPORTED_EXTENSIONS {
            let path = std::path::PathBuf::from(format!("/nonexistent/upload{}", ext));
            let result = pipeline.extract(&path).await;
            assert_eq!(result.language, "error", "{}", ext);
            assert!(result.error.is_some(), "{}", ext);
        }
    }

    #[tokio::test]
    async fn test_invalid_utf8_text_is_an_error_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "latin1.txt", &[0xff, 0xfe, 0x00, 0x41]);

        let result = pipeline("", false).extract(&path).await;
        assert!(result.is_error());
    }
}
