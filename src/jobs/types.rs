//! Job record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extract::ExtractionResult;
use crate::summarize::{SummaryResult, SummaryType};

/// Job lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Completed,
    Error,
}

/// Tracked state of one uploaded document
///
/// Result fields stay `None` (and are omitted from JSON) until the stage
/// producing them has finished.
#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub id: Uuid,
    pub filename: String,
    pub status: JobStatus,
    pub progress: u8,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_points: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_type: Option<SummaryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_generated_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobRecord {
    /// New record in the `processing` state
    pub fn new(id: Uuid, filename: impl Into<String>, progress: u8, message: impl Into<String>) -> Self {
        Self {
            id,
            filename: filename.into(),
            status: JobStatus::Processing,
            progress,
            message: message.into(),
            created_at: Utc::now(),
            completed_at: None,
            original_text: None,
            translated_text: None,
            language: None,
            confidence: None,
            processing_time: None,
            summary: None,
            key_points: None,
            summary_type: None,
            summary_generated_at: None,
            error: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, JobStatus::Completed | JobStatus::Error)
    }

    /// Move to a processing stage; progress never goes backwards
    pub fn advance(&mut self, progress: u8, message: impl Into<String>) {
        self.progress = self.progress.max(progress);
        self.message = message.into();
    }

    pub fn apply_extraction(&mut self, result: &ExtractionResult) {
        self.original_text = Some(result.original_text.clone());
        self.translated_text = Some(result.translated_text.clone());
        self.language = Some(result.language.clone());
        self.confidence = Some(result.confidence);
        self.processing_time = Some(result.processing_time);
    }

    pub fn apply_summary(&mut self, result: &SummaryResult) {
        self.summary = Some(result.summary.clone());
        self.key_points = Some(result.key_points.clone());
        self.summary_type = Some(result.summary_type);
        self.summary_generated_at = Some(Utc::now());
    }

    pub fn complete(&mut self, progress: u8, message: impl Into<String>) {
        self.status = JobStatus::Completed;
        self.advance(progress, message);
        self.completed_at.get_or_insert_with(Utc::now);
    }

    pub fn fail(&mut self, error: impl Into<String>, message: impl Into<String>) {
        self.status = JobStatus::Error;
        self.error = Some(error.into());
        self.message = message.into();
        self.completed_at.get_or_insert_with(Utc::now);
    }
}

/// Aggregate counts over the registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct JobStats {
    pub total: usize,
    pub processing: usize,
    pub completed: usize,
    pub errors: usize,
    /// Completed jobs whose detected language is Malayalam
    pub malayalam: usize,
}

impl JobStats {
    /// Percentage of jobs that completed, 0 when there are none
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64 * 100.0
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Job not found: {0}")]
    NotFound(String),

    #[error("Job queue is closed")]
    QueueClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_serializes_only_initial_fields() {
        let record = JobRecord::new(Uuid::new_v4(), "letter.png", 10, "uploaded");
        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj["status"], "processing");
        assert_eq!(obj["progress"], 10);
        assert!(obj.contains_key("created_at"));
        assert!(!obj.contains_key("translated_text"));
        assert!(!obj.contains_key("summary"));
        assert!(!obj.contains_key("error"));
        assert!(!obj.contains_key("completed_at"));
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut record = JobRecord::new(Uuid::new_v4(), "a.txt", 30, "ocr");
        record.advance(10, "late update");
        assert_eq!(record.progress, 30);
        assert_eq!(record.message, "late update");
    }

    #[test]
    fn test_completed_at_assigned_once() {
        let mut record = JobRecord::new(Uuid::new_v4(), "a.txt", 10, "uploaded");
        record.complete(100, "done");
        let first = record.completed_at;
        record.fail("late", "late");
        assert_eq!(record.completed_at, first);
        assert!(record.is_terminal());
    }

    #[test]
    fn test_success_rate() {
        let stats = JobStats {
            total: 4,
            completed: 3,
            ..Default::default()
        };
        assert_eq!(stats.success_rate(), 75.0);
        assert_eq!(JobStats::default().success_rate(), 0.0);
    }
}
