//! Store change events and the cache-mirror subscriber.
//!
//! Every successful store mutation produces a [`StoreChange`] descriptor
//! plus an immutable [`StoreSnapshot`], delivered to registered observers.
//! Persistence is one such observer: [`CacheMirror`] rewrites the affected
//! cache keys wholesale and never surfaces a failure, so "the mutation
//! succeeded" and "the cache got written" stay decoupled.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use khata_domain::{Category, PendingTransaction, Transaction};

use crate::ports::{cache_keys, LocalCache};

/// Immutable view of the store state after a change was applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub pending_adds: Vec<PendingTransaction>,
    pub pending_deletes: Vec<String>,
}

/// Describes which mutation produced a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreChange {
    /// Initial load or startup reconciliation completed.
    Loaded,
    /// A transaction was added; `queued` marks the offline path where the
    /// write also entered the pending-add queue.
    TransactionAdded { id: String, queued: bool },
    /// A transaction was removed; `queued` marks the offline path where a
    /// pending queue was touched as well.
    TransactionRemoved { id: String, queued: bool },
    CategoryAdded { id: String },
    /// A connectivity-restored drain replayed queued operations.
    PendingReplayed {
        adds_flushed: usize,
        deletes_flushed: usize,
    },
}

/// Receives every applied change together with the resulting snapshot.
pub trait StoreObserver: Send + Sync {
    fn on_change(&self, change: &StoreChange, snapshot: &StoreSnapshot);
}

/// Persistence subscriber mirroring store state into the local cache.
///
/// Writes are best-effort: a failure is logged at `warn!` and dropped. The
/// mirror also handles the startup read of all four cache keys.
pub struct CacheMirror {
    cache: Arc<dyn LocalCache>,
}

impl CacheMirror {
    pub fn new(cache: Arc<dyn LocalCache>) -> Self {
        Self { cache }
    }

    /// Reads the cached snapshot. Absent or unreadable keys fall back to
    /// empty collections; corruption is logged, not propagated.
    pub fn load(&self) -> StoreSnapshot {
        StoreSnapshot {
            transactions: self.read_json(cache_keys::TRANSACTIONS),
            categories: self.read_json(cache_keys::CATEGORIES),
            pending_adds: self.read_json(cache_keys::PENDING_TRANSACTIONS),
            pending_deletes: self.read_json(cache_keys::PENDING_DELETES),
        }
    }

    fn read_json<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.cache.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(err) => {
                warn!(key, %err, "local cache read failed");
                return T::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, %err, "local cache entry is corrupt, ignoring it");
                T::default()
            }
        }
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(err) => {
                warn!(key, %err, "failed to serialize cache entry");
                return;
            }
        };
        if let Err(err) = self.cache.set(key, &json) {
            warn!(key, %err, "local cache write failed");
        }
    }

    fn write_queues(&self, snapshot: &StoreSnapshot) {
        self.write_json(cache_keys::PENDING_TRANSACTIONS, &snapshot.pending_adds);
        self.write_json(cache_keys::PENDING_DELETES, &snapshot.pending_deletes);
    }
}

impl StoreObserver for CacheMirror {
    fn on_change(&self, change: &StoreChange, snapshot: &StoreSnapshot) {
        match change {
            StoreChange::Loaded => {
                self.write_json(cache_keys::TRANSACTIONS, &snapshot.transactions);
                self.write_json(cache_keys::CATEGORIES, &snapshot.categories);
                self.write_queues(snapshot);
            }
            StoreChange::TransactionAdded { queued, .. }
            | StoreChange::TransactionRemoved { queued, .. } => {
                self.write_json(cache_keys::TRANSACTIONS, &snapshot.transactions);
                if *queued {
                    self.write_queues(snapshot);
                }
            }
            StoreChange::CategoryAdded { .. } => {
                self.write_json(cache_keys::CATEGORIES, &snapshot.categories);
            }
            StoreChange::PendingReplayed { .. } => {
                self.write_queues(snapshot);
            }
        }
    }
}
