//! Loading state around an [`ErrorStore`].

use std::sync::Arc;
use tokio::sync::watch;

use super::ErrorStore;
use crate::models::UploadErrorRecord;
use crate::notice::NoticeCenter;

/// Notice raised when error records cannot be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load detailed error information";

/// Holds the error records of the last successfully loaded session.
pub struct ErrorFetcher {
    store: Arc<dyn ErrorStore>,
    notices: NoticeCenter,
    errors: Vec<UploadErrorRecord>,
    loading: watch::Sender<bool>,
}

impl ErrorFetcher {
    pub fn new(store: Arc<dyn ErrorStore>, notices: NoticeCenter) -> Self {
        let (loading, _) = watch::channel(false);
        Self {
            store,
            notices,
            errors: Vec::new(),
            loading,
        }
    }

    /// Load every record of `session_id`.
    ///
    /// Returns whether the load succeeded. On failure the previous records
    /// are kept and a notice is raised; there is no retry.
    pub async fn load(&mut self, session_id: &str) -> bool {
        self.loading.send_replace(true);
        let result = self.store.fetch_errors(session_id).await;
        self.loading.send_replace(false);

        match result {
            Ok(records) => {
                log::info!("Fetched {} error records for session {}", records.len(), session_id);
                self.errors = records;
                true
            }
            Err(e) => {
                log::error!("Error fetching upload errors for session {}: {}", session_id, e);
                self.notices.error(LOAD_FAILED_MESSAGE);
                false
            }
        }
    }

    pub fn errors(&self) -> &[UploadErrorRecord] {
        &self.errors
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Loading flag, `true` while a query is in flight.
    pub fn watch_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn store(&self) -> Arc<dyn ErrorStore> {
        Arc::clone(&self.store)
    }

    /// Forget loaded records.
    pub fn clear(&mut self) {
        self.errors.clear();
        self.loading.send_replace(false);
    }
}
