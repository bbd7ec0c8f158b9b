//! Configuration management for KMRL OCR Server
//!
//! Every value has a default; environment variables (optionally loaded from
//! a `.env` file) override them.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::ocr::OcrProvider;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Unknown OCR provider: {0}")]
    UnknownProvider(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub ocr: OcrConfig,
    pub translation: TranslationConfig,
    pub summary: SummaryConfig,
    pub jobs: JobConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Path or name of the tesseract executable
    pub tesseract_cmd: String,
    /// Tesseract language pack
    pub language: String,
    /// Providers in the order they are tried
    pub providers: Vec<OcrProvider>,
    pub ollama_url: String,
    pub ollama_model: String,
    /// Embedded PDF text shorter than this is treated as a scanned document
    pub pdf_min_text_chars: usize,
    pub pdf_max_pages: usize,
    pub pdf_render_scale: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationConfig {
    pub endpoint: String,
    pub source_lang: String,
    pub target_lang: String,
    /// Detected languages that get translated; anything else is treated as
    /// already being in the target language
    pub translate_languages: Vec<String>,
    pub chunk_chars: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryConfig {
    /// When false the extractive strategy is used without probing a model
    pub enabled: bool,
    pub ollama_url: String,
    pub model: String,
    pub max_length: usize,
    pub min_length: usize,
    pub max_input_chars: usize,
    pub min_text_chars: usize,
    pub max_key_points: usize,
    pub key_point_min_chars: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    pub workers: usize,
    pub timeout_secs: u64,
    pub progress: ProgressConfig,
}

/// Progress percentages reported at each stage transition
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ProgressConfig {
    pub uploaded: u8,
    pub extracting: u8,
    pub summarizing: u8,
    pub completed: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                ],
            },
            storage: StorageConfig {
                upload_dir: PathBuf::from("uploads"),
                max_upload_bytes: 50 * 1024 * 1024,
            },
            ocr: OcrConfig {
                tesseract_cmd: "tesseract".to_string(),
                language: "mal".to_string(),
                providers: vec![OcrProvider::Tesseract],
                ollama_url: "http://localhost:11434".to_string(),
                ollama_model: "llava".to_string(),
                pdf_min_text_chars: 50,
                pdf_max_pages: 50,
                pdf_render_scale: 2.0,
            },
            translation: TranslationConfig {
                endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
                source_lang: "ml".to_string(),
                target_lang: "en".to_string(),
                translate_languages: vec!["ml".to_string(), "unknown".to_string()],
                chunk_chars: 4500,
                timeout_secs: 30,
            },
            summary: SummaryConfig {
                enabled: true,
                ollama_url: "http://localhost:11434".to_string(),
                model: "llama3.2".to_string(),
                max_length: 150,
                min_length: 30,
                max_input_chars: 1000,
                min_text_chars: 50,
                max_key_points: 5,
                key_point_min_chars: 20,
            },
            jobs: JobConfig {
                workers: 4,
                timeout_secs: 300,
                progress: ProgressConfig {
                    uploaded: 10,
                    extracting: 30,
                    summarizing: 80,
                    completed: 100,
                },
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let ollama_url = env::var("OLLAMA_URL").unwrap_or(defaults.ocr.ollama_url);

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", defaults.server.port)?,
                cors_origins: list_var("CORS_ORIGINS").unwrap_or(defaults.server.cors_origins),
            },
            storage: StorageConfig {
                upload_dir: env::var("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.upload_dir),
                max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", defaults.storage.max_upload_bytes)?,
            },
            ocr: OcrConfig {
                tesseract_cmd: env::var("TESSERACT_CMD").unwrap_or(defaults.ocr.tesseract_cmd),
                language: env::var("OCR_LANGUAGE").unwrap_or(defaults.ocr.language),
                providers: match list_var("OCR_PROVIDERS") {
                    Some(names) => names
                        .iter()
                        .map(|name| parse_provider(name))
                        .collect::<Result<Vec<_>, _>>()?,
                    None => defaults.ocr.providers,
                },
                ollama_url: ollama_url.clone(),
                ollama_model: env::var("OCR_OLLAMA_MODEL").unwrap_or(defaults.ocr.ollama_model),
                pdf_min_text_chars: parse_var("PDF_MIN_TEXT_CHARS", defaults.ocr.pdf_min_text_chars)?,
                pdf_max_pages: parse_var("PDF_MAX_PAGES", defaults.ocr.pdf_max_pages)?,
                pdf_render_scale: parse_var("PDF_RENDER_SCALE", defaults.ocr.pdf_render_scale)?,
            },
            translation: TranslationConfig {
                endpoint: env::var("TRANSLATE_ENDPOINT").unwrap_or(defaults.translation.endpoint),
                source_lang: env::var("TRANSLATE_SOURCE").unwrap_or(defaults.translation.source_lang),
                target_lang: env::var("TRANSLATE_TARGET").unwrap_or(defaults.translation.target_lang),
                translate_languages: list_var("TRANSLATE_LANGUAGES")
                    .unwrap_or(defaults.translation.translate_languages),
                chunk_chars: parse_var("TRANSLATE_CHUNK_CHARS", defaults.translation.chunk_chars)?,
                timeout_secs: parse_var("TRANSLATE_TIMEOUT_SECS", defaults.translation.timeout_secs)?,
            },
            summary: SummaryConfig {
                enabled: parse_var("SUMMARY_ENABLED", defaults.summary.enabled)?,
                ollama_url,
                model: env::var("SUMMARY_MODEL").unwrap_or(defaults.summary.model),
                max_length: parse_var("SUMMARY_MAX_LENGTH", defaults.summary.max_length)?,
                min_length: parse_var("SUMMARY_MIN_LENGTH", defaults.summary.min_length)?,
                max_input_chars: parse_var("SUMMARY_MAX_INPUT_CHARS", defaults.summary.max_input_chars)?,
                min_text_chars: parse_var("SUMMARY_MIN_TEXT_CHARS", defaults.summary.min_text_chars)?,
                max_key_points: parse_var("SUMMARY_MAX_KEY_POINTS", defaults.summary.max_key_points)?,
                key_point_min_chars: parse_var(
                    "SUMMARY_KEY_POINT_MIN_CHARS",
                    defaults.summary.key_point_min_chars,
                )?,
            },
            jobs: JobConfig {
                workers: parse_var("JOB_WORKERS", defaults.jobs.workers)?.max(1),
                timeout_secs: parse_var("JOB_TIMEOUT_SECS", defaults.jobs.timeout_secs)?,
                progress: ProgressConfig {
                    uploaded: parse_var("PROGRESS_UPLOADED", defaults.jobs.progress.uploaded)?,
                    extracting: parse_var("PROGRESS_EXTRACTING", defaults.jobs.progress.extracting)?,
                    summarizing: parse_var("PROGRESS_SUMMARIZING", defaults.jobs.progress.summarizing)?,
                    completed: parse_var("PROGRESS_COMPLETED", defaults.jobs.progress.completed)?,
                },
            },
        })
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        Err(_) => Ok(default),
    }
}

/// Comma separated list; `None` when the variable is unset or blank
fn list_var(key: &str) -> Option<Vec<String>> {
    let value = env::var(key).ok()?;
    let items: Vec<String> = value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

fn parse_provider(name: &str) -> Result<OcrProvider, ConfigError> {
    match name.to_ascii_lowercase().as_str() {
        "tesseract" => Ok(OcrProvider::Tesseract),
        "ollama" => Ok(OcrProvider::Ollama),
        _ => Err(ConfigError::UnknownProvider(name.to_string())),
    }
}
