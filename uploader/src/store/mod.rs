//! Backing store for row-level error records.
//!
//! The upload function writes one row per validation failure into the
//! `bulletin_upload_errors` table; this module reads them back.
//!
//! - [`ErrorStore`] - Query seam
//! - [`RestErrorStore`] - PostgREST implementation over `reqwest`
//! - [`ErrorFetcher`] - Loading state around a store

mod fetcher;
#[cfg(test)]
mod memory;

pub use fetcher::ErrorFetcher;
#[cfg(test)]
pub use memory::MemoryErrorStore;

use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use crate::models::UploadErrorRecord;

/// Read access to error records.
#[async_trait]
pub trait ErrorStore: Send + Sync {
    /// All records of a session, ordered by sheet name then row number.
    async fn fetch_errors(&self, session_id: &str) -> StoreResult<Vec<UploadErrorRecord>>;
}

/// Sheet name ascending, then row number ascending with missing rows last.
/// The sort is stable, so ties keep store order.
pub fn sort_records(records: &mut [UploadErrorRecord]) {
    records.sort_by(|a, b| {
        a.sheet_name
            .cmp(&b.sheet_name)
            .then_with(|| match (a.row_number, b.row_number) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    });
}

// =============================================================================
// REST store
// =============================================================================

/// Store backed by the hosted database's REST interface.
#[derive(Clone)]
pub struct RestErrorStore {
    client: reqwest::Client,
    url: String,
    anon_key: Option<String>,
    auth: Arc<dyn AuthProvider>,
}

impl RestErrorStore {
    pub fn new(config: &Config, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.errors_url(),
            anon_key: config.anon_key.clone(),
            auth,
        }
    }
}

#[async_trait]
impl ErrorStore for RestErrorStore {
    async fn fetch_errors(&self, session_id: &str) -> StoreResult<Vec<UploadErrorRecord>> {
        let token = self.auth.access_token()?;

        let filter = format!("eq.{}", session_id);
        let mut request = self
            .client
            .get(&self.url)
            .query(&[
                ("select", "*"),
                ("session_id", filter.as_str()),
                ("order", "sheet_name.asc,row_number.asc"),
            ])
            .header("Authorization", token.bearer());
        if let Some(key) = &self.anon_key {
            request = request.header("apikey", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(StoreError::Status { status: status.as_u16(), body });
        }

        let mut records: Vec<UploadErrorRecord> =
            serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))?;

        // PostgREST already orders; re-sort so every store behaves the same
        sort_records(&mut records);
        log::debug!("Loaded {} error records for session {}", records.len(), session_id);
        Ok(records)
    }
}
