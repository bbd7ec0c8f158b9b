//! Job Registry
//!
//! In-memory job store shared by the HTTP handlers and the workers. Records
//! are keyed by id and listed in creation order. Nothing is persisted.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::types::{JobError, JobRecord, JobStats, JobStatus};

/// Shared handle to the job registry
#[derive(Clone, Default)]
pub struct JobStore {
    inner: Arc<RwLock<JobTable>>,
}

#[derive(Default)]
struct JobTable {
    records: HashMap<Uuid, JobRecord>,
    /// Ids in creation order
    order: Vec<Uuid>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new record; it is visible to readers immediately
    pub async fn insert(&self, record: JobRecord) {
        let mut table = self.inner.write().await;
        let id = record.id;
        if table.records.insert(id, record).is_none() {
            table.order.push(id);
        }
    }

    pub async fn get(&self, id: Uuid) -> Option<JobRecord> {
        self.inner.read().await.records.get(&id).cloned()
    }

    /// Look up by the string form used in URLs
    pub async fn get_by_str(&self, id: &str) -> Result<JobRecord, JobError> {
        let uuid = parse_id(id)?;
        self.get(uuid)
            .await
            .ok_or_else(|| JobError::NotFound(id.to_string()))
    }

    /// Mutate a record in place and return the updated copy
    pub async fn update<F>(&self, id: Uuid, f: F) -> Result<JobRecord, JobError>
    where
        F: FnOnce(&mut JobRecord),
    {
        let mut table = self.inner.write().await;
        let record = table
            .records
            .get_mut(&id)
            .ok_or_else(|| JobError::NotFound(id.to_string()))?;

        f(record);
        Ok(record.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Result<JobRecord, JobError> {
        let mut table = self.inner.write().await;
        let record = table
            .records
            .remove(&id)
            .ok_or_else(|| JobError::NotFound(id.to_string()))?;
        table.order.retain(|existing| *existing != id);

        tracing::info!(job_id = %id, filename = %record.filename, "Removed job record");

        Ok(record)
    }

    /// All records in creation order
    pub async fn list(&self) -> Vec<JobRecord> {
        let table = self.inner.read().await;
        table
            .order
            .iter()
            .filter_map(|id| table.records.get(id).cloned())
            .collect()
    }

    /// The `n` most recently created records, oldest first
    pub async fn recent(&self, n: usize) -> Vec<JobRecord> {
        let table = self.inner.read().await;
        let skip = table.order.len().saturating_sub(n);
        table
            .order
            .iter()
            .skip(skip)
            .filter_map(|id| table.records.get(id).cloned())
            .collect()
    }

    pub async fn stats(&self) -> JobStats {
        let table = self.inner.read().await;
        let mut stats = JobStats {
            total: table.records.len(),
            ..Default::default()
        };

        for record in table.records.values() {
            match record.status {
                JobStatus::Processing => stats.processing += 1,
                JobStatus::Completed => {
                    stats.completed += 1;
                    if record.language.as_deref() == Some("ml") {
                        stats.malayalam += 1;
                    }
                }
                JobStatus::Error => stats.errors += 1,
            }
        }

        stats
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Parse a job id from its URL form; malformed ids are simply unknown
pub fn parse_id(id: &str) -> Result<Uuid, JobError> {
    Uuid::parse_str(id).map_err(|_| JobError::NotFound(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> JobRecord {
        JobRecord::new(Uuid::new_v4(), name, 10, "uploaded")
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = JobStore::new();
        let job = record("a.txt");
        let id = job.id;

        store.insert(job).await;

        let found = store.get(id).await.unwrap();
        assert_eq!(found.filename, "a.txt");
        assert_eq!(found.status, JobStatus::Processing);
        assert_eq!(store.get_by_str(&id.to_string()).await.unwrap().id, id);
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids_are_not_found() {
        let store = JobStore::new();
        assert!(matches!(
            store.get_by_str(&Uuid::new_v4().to_string()).await,
            Err(JobError::NotFound(_))
        ));
        assert!(matches!(
            store.get_by_str("not-a-uuid").await,
            Err(JobError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_preserves_creation_order() {
        let store = JobStore::new();
        for name in ["1.txt", "2.txt", "3.txt"] {
            store.insert(record(name)).await;
        }

        let names: Vec<_> = store.list().await.into_iter().map(|r| r.filename).collect();
        assert_eq!(names, vec!["1.txt", "2.txt", "3.txt"]);
    }

    #[tokio::test]
    async fn test_recent_returns_last_n() {
        let store = JobStore::new();
        for i in 0..7 {
            store.insert(record(&format!("{}.txt", i))).await;
        }

        let names: Vec<_> = store.recent(5).await.into_iter().map(|r| r.filename).collect();
        assert_eq!(names, vec!["2.txt", "3.txt", "4.txt", "5.txt", "6.txt"]);
        assert_eq!(store.recent(50).await.len(), 7);
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let store = JobStore::new();
        let job = record("a.txt");
        let id = job.id;
        store.insert(job).await;

        let updated = store
            .update(id, |r| r.complete(100, "done"))
            .await
            .unwrap();
        assert_eq!(updated.status, JobStatus::Completed);

        store.remove(id).await.unwrap();
        assert!(store.get(id).await.is_none());
        assert!(store.list().await.is_empty());
        assert!(matches!(
            store.update(id, |r| r.advance(30, "x")).await,
            Err(JobError::NotFound(_))
        ));
        assert!(store.remove(id).await.is_err());
    }

    #[tokio::test]
    async fn test_stats() {
        let store = JobStore::new();

        let mut ml = record("ml.png");
        ml.language = Some("ml".into());
        ml.complete(100, "done");
        let mut en = record("en.txt");
        en.language = Some("en".into());
        en.complete(100, "done");
        let mut failed = record("bad.pdf");
        failed.fail("boom", "failed");

        for r in [ml, en, failed, record("pending.jpg")] {
            store.insert(r).await;
        }

        let stats = store.stats().await;
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.processing, 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.malayalam, 1);
        assert_eq!(stats.success_rate(), 50.0);
    }
}
