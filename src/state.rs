//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::extract::ExtractionPipeline;
use crate::jobs::{DocumentProcessor, JobQueue, JobStore, WorkerPool};
use crate::ocr::OcrService;
use crate::summarize::Summarizer;
use crate::translate::{GoogleTranslator, TranslateError, Translator};

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to initialize translator: {0}")]
    TranslatorInit(#[from] TranslateError),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    jobs: JobStore,
    queue: JobQueue,
    ocr: Arc<OcrService>,
    summarizer: Arc<Summarizer>,
}

impl AppState {
    /// Create the application state with the configured backends
    ///
    /// Checks the summary model and starts the worker pool. The returned
    /// pool must be shut down by the caller.
    pub async fn new(config: Config) -> Result<(Self, WorkerPool), StateError> {
        let ocr = OcrService::new(&config.ocr);
        let translator = GoogleTranslator::new(&config.translation)?;
        let summarizer = Summarizer::initialize(&config.summary).await;

        Ok(Self::with_services(config, ocr, Arc::new(translator), summarizer))
    }

    /// Create the application state around already-built services
    pub fn with_services(
        config: Config,
        ocr: OcrService,
        translator: Arc<dyn Translator>,
        summarizer: Summarizer,
    ) -> (Self, WorkerPool) {
        let ocr = Arc::new(ocr);
        let summarizer = Arc::new(summarizer);
        let jobs = JobStore::new();

        let pipeline = ExtractionPipeline::new(
            Arc::clone(&ocr),
            translator,
            &config.ocr,
            config.translation.clone(),
        );
        let processor = DocumentProcessor::new(
            jobs.clone(),
            Arc::new(pipeline),
            Arc::clone(&summarizer),
            config.jobs.clone(),
        );
        let (queue, pool) = WorkerPool::start(Arc::new(processor), config.jobs.workers);

        let state = Self {
            inner: Arc::new(AppStateInner {
                config,
                jobs,
                queue,
                ocr,
                summarizer,
            }),
        };

        (state, pool)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the job registry
    pub fn jobs(&self) -> &JobStore {
        &self.inner.jobs
    }

    /// Get the job queue
    pub fn queue(&self) -> &JobQueue {
        &self.inner.queue
    }

    pub fn ocr(&self) -> &OcrService {
        &self.inner.ocr
    }

    pub fn summarizer(&self) -> &Summarizer {
        &self.inner.summarizer
    }
}
