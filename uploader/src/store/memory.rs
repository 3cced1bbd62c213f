use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::{sort_records, ErrorStore};
use crate::error::{StoreError, StoreResult};
use crate::models::UploadErrorRecord;

/// Store holding records in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryErrorStore {
    records: Arc<Mutex<Vec<UploadErrorRecord>>>,
    requests: Arc<Mutex<Vec<String>>>,
    fail_with: Arc<Mutex<Option<String>>>,
}

impl MemoryErrorStore {
    pub fn new(records: Vec<UploadErrorRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            ..Self::default()
        }
    }

    /// Make every following query fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *lock(&self.fail_with) = Some(message.into());
    }

    /// Session ids queried so far.
    pub fn requests(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl ErrorStore for MemoryErrorStore {
    async fn fetch_errors(&self, session_id: &str) -> StoreResult<Vec<UploadErrorRecord>> {
        lock(&self.requests).push(session_id.to_string());

        if let Some(message) = lock(&self.fail_with).clone() {
            return Err(StoreError::Request(message));
        }

        let mut records: Vec<UploadErrorRecord> = lock(&self.records)
            .iter()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect();
        sort_records(&mut records);
        Ok(records)
    }
}
