//! Document processing workers
//!
//! Uploads are queued as [`JobTask`]s and drained by a fixed pool of tokio
//! tasks. Each job runs extraction and, when there is enough translated
//! text, summarization, updating its record by id after every step.
//!
//! Every job reaches a terminal state: the whole run is bounded by the
//! configured timeout. On shutdown workers finish their in-flight job and
//! exit; tasks still queued are dropped.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::store::JobStore;
use super::types::{JobError, JobRecord};
use crate::config::JobConfig;
use crate::extract::ExtractionPipeline;
use crate::summarize::Summarizer;

/// A queued upload
#[derive(Debug, Clone)]
pub struct JobTask {
    pub id: Uuid,
    pub path: PathBuf,
    pub filename: String,
}

/// Runs one job through the processing stages
pub struct DocumentProcessor {
    store: JobStore,
    pipeline: Arc<ExtractionPipeline>,
    summarizer: Arc<Summarizer>,
    config: JobConfig,
}

/// Record disappeared (deleted by a client) while the job was running
struct Abandoned;

impl From<JobError> for Abandoned {
    fn from(_: JobError) -> Self {
        Abandoned
    }
}

impl DocumentProcessor {
    pub fn new(
        store: JobStore,
        pipeline: Arc<ExtractionPipeline>,
        summarizer: Arc<Summarizer>,
        config: JobConfig,
    ) -> Self {
        Self {
            store,
            pipeline,
            summarizer,
            config,
        }
    }

    /// Process a job to a terminal state
    pub async fn process(&self, task: JobTask) {
        tracing::info!(job_id = %task.id, filename = %task.filename, "Starting document processing");

        let timeout = Duration::from_secs(self.config.timeout_secs);
        let outcome = tokio::time::timeout(timeout, self.run_stages(&task)).await;

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(Abandoned)) => {
                tracing::warn!(job_id = %task.id, "Job record removed during processing, abandoning job");
            }
            Err(_) => {
                let message = format!("Processing timed out after {} seconds", self.config.timeout_secs);
                tracing::error!(job_id = %task.id, filename = %task.filename, "{}", message);

                let result = self
                    .store
                    .update(task.id, |record| {
                        if !record.is_terminal() {
                            record.fail(message.clone(), format!("Processing failed: {}", message));
                        }
                    })
                    .await;

                if result.is_err() {
                    tracing::warn!(job_id = %task.id, "Timed out job was already removed");
                }
            }
        }
    }

    async fn run_stages(&self, task: &JobTask) -> Result<(), Abandoned> {
        let progress = self.config.progress;

        self.store
            .update(task.id, |record| {
                record.advance(progress.extracting, "Running Malayalam OCR extraction...")
            })
            .await?;

        let extraction = self.pipeline.extract(&task.path).await;

        if let Some(error) = &extraction.error {
            tracing::error!(
                job_id = %task.id,
                filename = %task.filename,
                "Extraction failed: {}",
                error
            );
            self.store
                .update(task.id, |record| {
                    record.apply_extraction(&extraction);
                    record.fail(error.clone(), format!("Processing failed: {}", error));
                })
                .await?;
            return Ok(());
        }

        let summarize = self.summarizer.is_summarizable(&extraction.translated_text);

        self.store
            .update(task.id, |record| {
                record.apply_extraction(&extraction);
                if summarize {
                    record.advance(progress.summarizing, "Generating AI summary...");
                }
            })
            .await?;

        if summarize {
            let summary = self
                .summarizer
                .summarize(
                    &extraction.translated_text,
                    self.summarizer.default_max_length(),
                )
                .await;

            tracing::debug!(
                job_id = %task.id,
                summary_type = summary.summary_type.as_str(),
                key_points = summary.key_points.len(),
                "Summary generated"
            );

            self.store
                .update(task.id, |record| record.apply_summary(&summary))
                .await?;
        }

        let record: JobRecord = self
            .store
            .update(task.id, |record| {
                record.complete(
                    progress.completed,
                    "Malayalam OCR processing completed successfully",
                )
            })
            .await?;

        tracing::info!(
            job_id = %task.id,
            filename = %task.filename,
            language = record.language.as_deref().unwrap_or("unknown"),
            processing_time = record.processing_time.unwrap_or_default(),
            "Document processing completed"
        );

        Ok(())
    }
}

/// Submission side of the job queue
#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::UnboundedSender<JobTask>,
}

impl JobQueue {
    pub fn submit(&self, task: JobTask) -> Result<(), JobError> {
        self.tx.send(task).map_err(|_| JobError::QueueClosed)
    }
}

/// Handles to the running workers
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
    shutdown: watch::Sender<bool>,
}

impl WorkerPool {
    /// Start `workers` workers draining a new queue
    pub fn start(processor: Arc<DocumentProcessor>, workers: usize) -> (JobQueue, WorkerPool) {
        let (tx, rx) = mpsc::unbounded_channel();
        let rx = Arc::new(Mutex::new(rx));
        let (shutdown, shutdown_rx) = watch::channel(false);

        let handles = (0..workers.max(1))
            .map(|worker_id| {
                tokio::spawn(worker_loop(
                    worker_id,
                    Arc::clone(&rx),
                    Arc::clone(&processor),
                    shutdown_rx.clone(),
                ))
            })
            .collect();

        tracing::info!(workers = workers.max(1), "Started document workers");

        (JobQueue { tx }, WorkerPool { handles, shutdown })
    }

    /// Stop the workers
    ///
    /// Workers finish their current job and exit. Any still running after
    /// `grace` are aborted.
    pub async fn shutdown(self, grace: Duration) {
        let _ = self.shutdown.send(true);

        let handles = self.handles;
        let aborts: Vec<_> = handles.iter().map(|h| h.abort_handle()).collect();

        let joined = tokio::time::timeout(grace, async {
            for handle in handles {
                let _ = handle.await;
            }
        })
        .await;

        if joined.is_err() {
            tracing::warn!("Workers did not stop within {:?}, aborting", grace);
            for abort in aborts {
                abort.abort();
            }
        } else {
            tracing::info!("Document workers stopped");
        }
    }
}

async fn worker_loop(
    worker_id: usize,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<JobTask>>>,
    processor: Arc<DocumentProcessor>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        if *shutdown.borrow() {
            break;
        }

        let task = {
            let mut rx = rx.lock().await;
            tokio::select! {
                biased;
                _ = shutdown.changed() => None,
                task = rx.recv() => task,
            }
        };

        match task {
            Some(task) => {
                tracing::debug!(worker_id, job_id = %task.id, "Worker picked up job");
                processor.process(task).await;
            }
            None => break,
        }
    }

    tracing::debug!(worker_id, "Worker exiting");
}
