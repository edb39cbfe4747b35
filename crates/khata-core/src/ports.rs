//! Port traits for the external collaborators: the remote document store,
//! the on-device key-value cache, and the connectivity feed.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::watch;

use crate::error::{CacheError, RemoteError};

/// Field map for a single remote document, as listed or created.
pub type FieldMap = Map<String, Value>;

/// Fixed keys under which the local cache mirrors store state. Each key
/// holds one whole-document JSON blob, rewritten wholesale on change.
pub mod cache_keys {
    pub const TRANSACTIONS: &str = "transactions";
    pub const CATEGORIES: &str = "categories";
    pub const PENDING_TRANSACTIONS: &str = "pendingTransactions";
    pub const PENDING_DELETES: &str = "pendingDeletes";
}

/// Hosted document database holding the durable transaction record,
/// reachable only when connectivity is available. The full collection is
/// always fetched; no filtering or pagination.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Creates a document and returns its remote-assigned id.
    async fn create_document(
        &self,
        collection: &str,
        fields: FieldMap,
    ) -> Result<String, RemoteError>;

    async fn list_documents(&self, collection: &str) -> Result<Vec<FieldMap>, RemoteError>;

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), RemoteError>;
}

/// On-device key-value cache, always available, not authoritative.
pub trait LocalCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;
    fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// Connectivity-change notification source: a one-shot probe plus a
/// subscription delivering connected/disconnected snapshots.
#[async_trait]
pub trait ConnectivityFeed: Send + Sync {
    async fn current_state(&self) -> bool;

    fn subscribe(&self) -> watch::Receiver<bool>;
}
