//! Reconciliation between the local catalog and its remote mirror.
//!
//! Local state is the source of truth: every mutation lands in memory and
//! on disk before a push is even queued, and a failed remote operation
//! never rolls anything back. A successful pull is the one exception:
//! it replaces the local collection wholesale.

pub mod remote;

#[cfg(test)]
mod tests;


use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};
use log::{debug, info, warn};
use serde::Serialize;

use crate::catalog::entry::{random_token, Entry, EntryDraft, EntryFilter};
use crate::catalog::store::{CatalogStore, SyncSettings};
use crate::catalog::Catalog;
use crate::sync::remote::RemoteStore;

const SYNC_KEY_LEN: usize = 20;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SyncActivity {
    Idle,
    InFlight,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub status: SyncActivity,
    pub configured: bool,
}

pub type SharedManager = Arc<Mutex<SyncManager>>;

/// Owns the catalog, its store, and the remote mirror. All mutations from
/// the command layer funnel through [`SyncManager::commit`].
pub struct SyncManager {
    catalog: Catalog,
    store: CatalogStore,
    remote: RemoteStore,
    sync_key: Option<String>,
    in_flight: Arc<AtomicUsize>,
}

impl SyncManager {
    pub fn open(store: CatalogStore, remote: RemoteStore) -> Self {
        let catalog = Catalog::new(store.load());
        let sync_key = store.load_settings().sync_key;
        SyncManager {
            catalog,
            store,
            remote,
            sync_key,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn list(&self, filter: &EntryFilter) -> Vec<Entry> {
        self.catalog.filtered(filter)
    }

    pub fn entry_url(&self, id: &str) -> Result<String> {
        self.catalog
            .get(id)
            .map(|e| e.url.clone())
            .ok_or_else(|| anyhow!("no entry with id {id}"))
    }

    pub fn add(&mut self, draft: EntryDraft) -> Result<Entry> {
        let entry = self.catalog.add(draft)?;
        self.commit()?;
        Ok(entry)
    }

    pub fn edit(&mut self, id: &str, draft: EntryDraft) -> Result<Entry> {
        let entry = self.catalog.edit(id, draft)?;
        self.commit()?;
        Ok(entry)
    }

    pub fn delete(&mut self, id: &str) -> Result<()> {
        if self.catalog.remove(id) {
            self.commit()?;
        }
        Ok(())
    }

    /// The single mutation exit point: persist the collection, then queue
    /// a push when a key is configured. The in-memory state has already
    /// moved forward by the time this runs.
    fn commit(&mut self) -> Result<()> {
        self.store.save(self.catalog.entries())?;
        self.queue_push();
        Ok(())
    }

    /// Push the current collection in the background. Each push carries
    /// the full snapshot taken here; nothing serializes concurrent pushes,
    /// so the last one to complete wins on the remote.
    fn queue_push(&self) {
        let Some(key) = self.sync_key.clone() else {
            return;
        };
        let remote = self.remote.clone();
        let snapshot = self.catalog.entries().to_vec();
        let in_flight = Arc::clone(&self.in_flight);
        tauri::async_runtime::spawn(async move {
            let _ticket = Ticket::hold(&in_flight);
            if let Err(e) = remote.push(&key, &snapshot).await {
                debug!("push to bucket {key} failed: {e}");
            }
        });
    }

    pub fn set_key(&mut self, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            bail!("sync key must not be empty");
        }
        self.sync_key = Some(key.to_string());
        self.store.save_settings(&SyncSettings {
            sync_key: self.sync_key.clone(),
        })?;
        Ok(())
    }

    pub fn generate_key(&mut self) -> Result<String> {
        let key = random_token(SYNC_KEY_LEN);
        self.set_key(&key)?;
        Ok(key)
    }

    /// Forget the sync key, returning to the unconfigured state.
    pub fn clear_key(&mut self) -> Result<()> {
        self.sync_key = None;
        self.store.save_settings(&SyncSettings::default())
    }

    pub fn is_configured(&self) -> bool {
        self.sync_key.is_some()
    }

    pub fn status(&self) -> SyncStatus {
        let status = if self.in_flight.load(Ordering::SeqCst) > 0 {
            SyncActivity::InFlight
        } else {
            SyncActivity::Idle
        };
        SyncStatus {
            status,
            configured: self.is_configured(),
        }
    }

    /// Replace the local collection with a pulled one and re-persist it.
    fn apply_remote(&mut self, entries: Vec<Entry>) -> Result<()> {
        self.catalog.replace_all(entries);
        self.store.save(self.catalog.entries())
    }
}

/// One outstanding remote operation. The indicator is a counter so
/// overlapping operations cannot clear each other's ticket.
struct Ticket(Arc<AtomicUsize>);

impl Ticket {
    fn hold(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Ticket(Arc::clone(counter))
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Run one pull and, on success, replace the local collection with the
/// result. Any failure leaves local state untouched; the only observable
/// effect is the in-flight indicator clearing. No-op without a key.
pub async fn pull_once(manager: SharedManager) {
    let (remote, key, in_flight) = {
        let Ok(guard) = manager.lock() else {
            warn!("state lock poisoned; skipping pull");
            return;
        };
        match guard.sync_key.clone() {
            Some(key) => (guard.remote.clone(), key, Arc::clone(&guard.in_flight)),
            None => return,
        }
    };

    let _ticket = Ticket::hold(&in_flight);
    match remote.pull(&key).await {
        Ok(entries) => {
            let count = entries.len();
            let applied = match manager.lock() {
                Ok(mut guard) => guard.apply_remote(entries),
                Err(_) => {
                    warn!("state lock poisoned; dropping pulled catalog");
                    return;
                }
            };
            match applied {
                Ok(()) => info!("replaced local catalog with {count} entries from bucket {key}"),
                Err(e) => warn!("could not persist pulled catalog: {e}"),
            }
        }
        Err(e) => debug!("pull from bucket {key} failed: {e}"),
    }
}

/// Fire-and-forget wrapper around [`pull_once`] for the command layer.
pub fn spawn_pull(manager: SharedManager) {
    tauri::async_runtime::spawn(pull_once(manager));
}
