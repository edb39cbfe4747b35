//! Remote write gating, queue draining, and the reconnect watcher.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use khata_domain::{PendingTransaction, Transaction};

use crate::error::{RemoteError, SyncError};
use crate::ports::{ConnectivityFeed, FieldMap, RemoteStore};

/// Decides, per mutation, whether a write reaches the remote store or fails
/// with the offline condition, and replays the pending queues once
/// connectivity is restored.
pub struct SyncCoordinator {
    remote: Arc<dyn RemoteStore>,
    connectivity: Arc<dyn ConnectivityFeed>,
    collection: String,
}

impl SyncCoordinator {
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        connectivity: Arc<dyn ConnectivityFeed>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            remote,
            connectivity,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn connectivity(&self) -> &Arc<dyn ConnectivityFeed> {
        &self.connectivity
    }

    /// Writes one transaction through to the remote store.
    ///
    /// The connectivity gate runs first: disconnected fails with
    /// [`SyncError::Offline`] before any remote call. Returns the
    /// remote-assigned document id on success.
    pub async fn write(&self, transaction: &Transaction) -> Result<String, SyncError> {
        if !self.connectivity.current_state().await {
            return Err(SyncError::Offline);
        }
        let fields = to_field_map(transaction)?;
        let remote_id = self.remote.create_document(&self.collection, fields).await?;
        debug!(local_id = %transaction.id, %remote_id, "remote write committed");
        Ok(remote_id)
    }

    /// Deletes one document, gated on connectivity like [`write`](Self::write).
    pub async fn delete(&self, id: &str) -> Result<(), SyncError> {
        if !self.connectivity.current_state().await {
            return Err(SyncError::Offline);
        }
        self.remote.delete_document(&self.collection, id).await?;
        debug!(id, "remote delete committed");
        Ok(())
    }

    /// Fetches the full collection. Malformed documents are skipped with a
    /// warning rather than failing the whole load.
    pub async fn fetch_all(&self) -> Result<Vec<Transaction>, SyncError> {
        if !self.connectivity.current_state().await {
            return Err(SyncError::Offline);
        }
        let documents = self.remote.list_documents(&self.collection).await?;
        let mut transactions = Vec::with_capacity(documents.len());
        for fields in documents {
            match serde_json::from_value::<Transaction>(Value::Object(fields)) {
                Ok(txn) => transactions.push(txn),
                Err(err) => warn!(%err, "skipping malformed remote document"),
            }
        }
        Ok(transactions)
    }

    /// Replays queued additions in insertion order. All-or-nothing: any
    /// failure aborts the drain and issues best-effort compensating deletes
    /// for documents created earlier in the same call, so a failed drain
    /// commits nothing observable and the caller keeps the queue untouched.
    /// Entries already marked synced are skipped. On success the caller
    /// clears the entire queue.
    pub async fn drain_pending_adds(&self, queue: &[PendingTransaction]) -> Result<(), SyncError> {
        let mut committed = Vec::new();
        for entry in queue {
            if !entry.is_pending() {
                continue;
            }
            match self.write(&entry.transaction).await {
                Ok(remote_id) => committed.push(remote_id),
                Err(err) => {
                    warn!(
                        local_id = %entry.transaction.id,
                        %err,
                        "pending add failed, aborting drain"
                    );
                    self.compensate(&committed).await;
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    async fn compensate(&self, remote_ids: &[String]) {
        for remote_id in remote_ids {
            if let Err(err) = self.remote.delete_document(&self.collection, remote_id).await {
                warn!(%remote_id, %err, "compensating delete failed");
            }
        }
    }

    /// Replays queued deletions in insertion order. Best-effort: a failure
    /// is logged and skipped, and processing continues. Returns the ids
    /// that failed; the caller retains exactly those.
    pub async fn drain_pending_deletes(&self, queue: &[String]) -> Vec<String> {
        let mut failed = Vec::new();
        for id in queue {
            match self.delete(id).await {
                Ok(()) => debug!(id, "pending delete replayed"),
                Err(err) => {
                    warn!(id, %err, "pending delete failed, keeping it queued");
                    failed.push(id.clone());
                }
            }
        }
        failed
    }
}

fn to_field_map(transaction: &Transaction) -> Result<FieldMap, SyncError> {
    match serde_json::to_value(transaction) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(RemoteError::new("transaction did not serialize to an object").into()),
        Err(err) => Err(RemoteError::new(err.to_string()).into()),
    }
}

/// Spawns a task that invokes `on_reconnect` on every transition of the
/// connectivity feed into the connected state.
///
/// Edge detection keeps a flood of repeated "still connected" snapshots
/// from re-triggering; `debounce` spaces out drains when the link flaps,
/// delaying (never dropping) a reconnect that lands inside the window.
pub fn spawn_reconnect_watcher<F, Fut>(
    connectivity: Arc<dyn ConnectivityFeed>,
    debounce: Duration,
    on_reconnect: F,
) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut receiver = connectivity.subscribe();
    // Baseline is captured before the task starts, so a transition landing
    // between subscribe and the first poll still registers as an edge.
    let mut was_connected = *receiver.borrow_and_update();
    tokio::spawn(async move {
        let mut last_fired: Option<Instant> = None;
        while receiver.changed().await.is_ok() {
            let connected = *receiver.borrow_and_update();
            let rising = connected && !was_connected;
            was_connected = connected;
            if !rising {
                continue;
            }
            if let Some(at) = last_fired {
                let since = at.elapsed();
                if since < debounce {
                    debug!("reconnect inside debounce window, delaying drain");
                    sleep(debounce - since).await;
                }
            }
            info!("connectivity restored, replaying pending operations");
            on_reconnect().await;
            last_fired = Some(Instant::now());
        }
    })
}
