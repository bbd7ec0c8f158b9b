//! Asynchronous document jobs
//!
//! - `types`: job records and their lifecycle transitions
//! - `store`: the in-memory job registry
//! - `worker`: the queue and worker pool that drive jobs to completion

pub mod store;
pub mod types;
pub mod worker;

pub use store::{parse_id, JobStore};
pub use types::{JobError, JobRecord, JobStats, JobStatus};
pub use worker::{DocumentProcessor, JobQueue, JobTask, WorkerPool};
