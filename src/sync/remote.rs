//! HTTP access to the public key-value store that mirrors the catalog.
//!
//! One bucket per sync key; the bucket holds a single JSON entry array.
//! Everything here is best-effort and unauthenticated.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

use crate::catalog::entry::Entry;

pub const DEFAULT_SYNC_BASE_URL: &str = "https://kvdb.io";
const SYNC_URL_ENV: &str = "LAUNCHDOCK_SYNC_URL";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Why a remote operation produced no usable result. The distinction is
/// kept through the sync layer even though the default UI surfaces none
/// of it.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("remote unreachable: {0}")]
    Transport(String),
    #[error("remote rejected the request with status {0}")]
    RemoteStatus(u16),
    #[error("remote payload is not an entry array: {0}")]
    MalformedPayload(String),
}

#[derive(Clone)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
}

impl RemoteStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        RemoteStore {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Base URL from `LAUNCHDOCK_SYNC_URL`, falling back to the built-in
    /// public store.
    pub fn from_env() -> Self {
        let base =
            std::env::var(SYNC_URL_ENV).unwrap_or_else(|_| DEFAULT_SYNC_BASE_URL.to_string());
        Self::new(base)
    }

    fn bucket_url(&self, key: &str) -> String {
        format!("{}/{key}/entries", self.base_url.trim_end_matches('/'))
    }

    /// Fetch the remote collection. Succeeds only when the remote answers
    /// 2xx with a body that decodes to an entry array; the caller must
    /// treat any error as "no trustworthy result", never as "remote is
    /// empty".
    pub async fn pull(&self, key: &str) -> Result<Vec<Entry>, SyncError> {
        let response = self
            .client
            .get(self.bucket_url(key))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::RemoteStatus(status.as_u16()));
        }

        response
            .json::<Vec<Entry>>()
            .await
            .map_err(|e| SyncError::MalformedPayload(e.to_string()))
    }

    /// Write the full collection to the remote bucket.
    pub async fn push(&self, key: &str, entries: &[Entry]) -> Result<(), SyncError> {
        let response = self
            .client
            .post(self.bucket_url(key))
            .timeout(REQUEST_TIMEOUT)
            .json(entries)
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::RemoteStatus(status.as_u16()));
        }
        Ok(())
    }
}
