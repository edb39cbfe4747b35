//! The in-memory transaction store.
//!
//! Owns the authoritative transaction and category lists plus both pending
//! queues for the current session, behind a single async mutex: user
//! mutations and connectivity-triggered drains serialize on the same lock,
//! so a drain can never interleave with a read-modify-write sequence.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use khata_domain::{Category, NewTransaction, PendingTransaction, Transaction, TransactionKind};

use crate::error::{CoreError, SyncError};
use crate::events::{CacheMirror, StoreChange, StoreObserver, StoreSnapshot};
use crate::ports::LocalCache;
use crate::summary::BalanceSummary;
use crate::sync::{spawn_reconnect_watcher, SyncCoordinator};

#[derive(Default)]
struct StoreState {
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
    pending_adds: Vec<PendingTransaction>,
    pending_deletes: Vec<String>,
}

impl StoreState {
    fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            transactions: self.transactions.clone(),
            categories: self.categories.clone(),
            pending_adds: self.pending_adds.clone(),
            pending_deletes: self.pending_deletes.clone(),
        }
    }
}

/// Mediates all mutations and mirrors every change into the local cache
/// through the registered observers.
pub struct TransactionStore {
    sync: SyncCoordinator,
    mirror: CacheMirror,
    observers: Vec<Box<dyn StoreObserver>>,
    state: Mutex<StoreState>,
}

impl TransactionStore {
    pub fn new(sync: SyncCoordinator, cache: Arc<dyn LocalCache>) -> Self {
        Self {
            sync,
            mirror: CacheMirror::new(cache),
            observers: Vec::new(),
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Registers an additional observer alongside the cache mirror.
    pub fn with_observer(mut self, observer: Box<dyn StoreObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Startup reconciliation.
    ///
    /// Attempts the full remote fetch first. A non-empty remote list
    /// becomes the in-memory state and overwrites the local transaction
    /// blob unconditionally (remote wins, no merge). An empty list falls
    /// back to the cached state, as does a failed fetch, which is logged
    /// and treated as empty. Categories come from the cache either way and are
    /// seeded with the default set when absent. Pending queues load from
    /// their own cache keys, independent of the transaction-list key, so
    /// queued work survives reconciliation.
    pub async fn load(&self) -> Result<(), CoreError> {
        let mut state = self.state.lock().await;
        let cached = self.mirror.load();

        state.pending_adds = cached.pending_adds;
        state.pending_deletes = cached.pending_deletes;

        let remote = match self.sync.fetch_all().await {
            Ok(transactions) => transactions,
            Err(err) => {
                warn!(%err, "initial remote fetch failed, using cached state");
                Vec::new()
            }
        };

        if remote.is_empty() {
            state.transactions = cached.transactions;
        } else {
            info!(count = remote.len(), "remote list adopted, local view overwritten");
            state.transactions = remote;
        }

        state.categories = if cached.categories.is_empty() {
            debug!("no cached categories, seeding the default set");
            Category::default_set()
        } else {
            cached.categories
        };

        self.notify(&StoreChange::Loaded, &state.snapshot());
        Ok(())
    }

    /// Validates and records a new transaction.
    ///
    /// The remote write is attempted first. Success inserts at the head of
    /// the in-memory list; the offline condition inserts at the head *and*
    /// queues a pending add. Any other error propagates with the in-memory
    /// state untouched.
    pub async fn add_transaction(&self, draft: NewTransaction) -> Result<Transaction, CoreError> {
        validate(&draft)?;
        let transaction = draft.build();

        let mut state = self.state.lock().await;
        let queued = match self.sync.write(&transaction).await {
            Ok(remote_id) => {
                debug!(local_id = %transaction.id, %remote_id, "transaction stored remotely");
                false
            }
            Err(SyncError::Offline) => {
                info!(local_id = %transaction.id, "offline, queueing transaction for replay");
                true
            }
            Err(err) => return Err(err.into()),
        };

        state.transactions.insert(0, transaction.clone());
        if queued {
            state
                .pending_adds
                .push(PendingTransaction::pending(transaction.clone()));
        }

        self.notify(
            &StoreChange::TransactionAdded {
                id: transaction.id.clone(),
                queued,
            },
            &state.snapshot(),
        );
        Ok(transaction)
    }

    /// Deletes a transaction by id. An unknown id is a no-op.
    ///
    /// Success drops the entry. The offline condition drops it anyway and
    /// records a pending delete, unless the id still sits in the
    /// pending-add queue, in which case the never-synced add is silently
    /// discarded instead. Other errors propagate untouched.
    pub async fn delete_transaction(&self, id: &str) -> Result<(), CoreError> {
        let mut state = self.state.lock().await;
        let queued = match self.sync.delete(id).await {
            Ok(()) => {
                // A queued add for this id would resurrect the transaction
                // on the next drain; purge it together with the list entry.
                let was_queued = state.pending_adds.iter().any(|p| p.transaction.id == id);
                state.pending_adds.retain(|p| p.transaction.id != id);
                was_queued
            }
            Err(SyncError::Offline) => {
                if state.pending_adds.iter().any(|p| p.transaction.id == id) {
                    debug!(id, "dropping never-synced queued add instead of queueing a delete");
                    state.pending_adds.retain(|p| p.transaction.id != id);
                } else {
                    info!(id, "offline, queueing delete for replay");
                    state.pending_deletes.push(id.to_string());
                }
                true
            }
            Err(err) => return Err(err.into()),
        };

        state.transactions.retain(|t| t.id != id);
        self.notify(
            &StoreChange::TransactionRemoved {
                id: id.to_string(),
                queued,
            },
            &state.snapshot(),
        );
        Ok(())
    }

    /// Adds a category. Purely local; no remote counterpart exists.
    pub async fn add_category(&self, name: &str) -> Result<Category, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation(
                "category name must not be empty".into(),
            ));
        }

        let mut state = self.state.lock().await;
        let category = Category::new(name);
        state.categories.push(category.clone());
        self.notify(
            &StoreChange::CategoryAdded {
                id: category.id.clone(),
            },
            &state.snapshot(),
        );
        Ok(category)
    }

    /// Replays both pending queues against the remote store.
    ///
    /// Adds drain all-or-nothing: the queue is cleared only when every
    /// entry committed, otherwise it is retained whole. Deletes drain
    /// best-effort: only the ids that failed stay queued. Deletes are
    /// attempted even when the add drain aborted; the add error is
    /// reported after both queues were processed and persisted.
    pub async fn drain_pending(&self) -> Result<(), CoreError> {
        let mut state = self.state.lock().await;
        if state.pending_adds.is_empty() && state.pending_deletes.is_empty() {
            return Ok(());
        }
        info!(
            adds = state.pending_adds.len(),
            deletes = state.pending_deletes.len(),
            "draining pending operations"
        );

        let mut adds_flushed = 0;
        let add_result = self.sync.drain_pending_adds(&state.pending_adds).await;
        if add_result.is_ok() {
            adds_flushed = state.pending_adds.len();
            state.pending_adds.clear();
        }

        let failed = self.sync.drain_pending_deletes(&state.pending_deletes).await;
        let deletes_flushed = state.pending_deletes.len() - failed.len();
        state.pending_deletes = failed;

        self.notify(
            &StoreChange::PendingReplayed {
                adds_flushed,
                deletes_flushed,
            },
            &state.snapshot(),
        );
        add_result.map_err(CoreError::from)
    }

    /// Spawns the reconnect watcher wired to [`drain_pending`](Self::drain_pending).
    pub fn spawn_drain_on_reconnect(self: &Arc<Self>, debounce: Duration) -> JoinHandle<()> {
        let store = Arc::clone(self);
        spawn_reconnect_watcher(
            Arc::clone(self.sync.connectivity()),
            debounce,
            move || {
                let store = Arc::clone(&store);
                async move {
                    if let Err(err) = store.drain_pending().await {
                        warn!(%err, "reconnect drain failed, queues retained");
                    }
                }
            },
        )
    }

    pub async fn transactions(&self) -> Vec<Transaction> {
        self.state.lock().await.transactions.clone()
    }

    pub async fn transactions_of_kind(&self, kind: TransactionKind) -> Vec<Transaction> {
        self.state
            .lock()
            .await
            .transactions
            .iter()
            .filter(|t| t.kind == kind)
            .cloned()
            .collect()
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.state.lock().await.categories.clone()
    }

    pub async fn pending_adds(&self) -> Vec<PendingTransaction> {
        self.state.lock().await.pending_adds.clone()
    }

    pub async fn pending_deletes(&self) -> Vec<String> {
        self.state.lock().await.pending_deletes.clone()
    }

    pub async fn balance(&self) -> BalanceSummary {
        BalanceSummary::compute(&self.state.lock().await.transactions)
    }

    fn notify(&self, change: &StoreChange, snapshot: &StoreSnapshot) {
        self.mirror.on_change(change, snapshot);
        for observer in &self.observers {
            observer.on_change(change, snapshot);
        }
    }
}

fn validate(draft: &NewTransaction) -> Result<(), CoreError> {
    if draft.title.trim().is_empty() {
        return Err(CoreError::Validation("title must not be empty".into()));
    }
    if !draft.amount.is_finite() || draft.amount <= 0.0 {
        return Err(CoreError::Validation(
            "amount must be a positive number".into(),
        ));
    }
    if draft.category.name.trim().is_empty() {
        return Err(CoreError::Validation(
            "category name must not be empty".into(),
        ));
    }
    Ok(())
}
