//! KMRL OCR Server Library
//!
//! Document intake for train induction planning: uploaded scans, PDFs and
//! text files are OCR'd (Malayalam first), translated to English and
//! summarized in the background. The HTTP binary is in main.rs.
//!
//! # Modules
//!
//! - `extract`: extraction-translation stage
//! - `summarize`: generative and extractive summaries
//! - `jobs`: job registry and worker pool
//! - `ocr`, `pdf`, `translate`: backends used by the stages
//! - `routes`: the axum HTTP surface

pub mod config;
pub mod error;
pub mod extract;
pub mod jobs;
pub mod ocr;
pub mod pdf;
pub mod routes;
pub mod state;
pub mod summarize;
pub mod translate;
