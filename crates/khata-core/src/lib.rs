//! khata-core
//!
//! Business logic and synchronization services for khata.
//! Depends on khata-domain. No UI and no direct filesystem access; the
//! remote store, local cache, and connectivity feed all enter through the
//! port traits in [`ports`].

pub mod error;
pub mod events;
pub mod ports;
pub mod store;
pub mod summary;
pub mod sync;


pub use error::{CacheError, CoreError, RemoteError, SyncError};
pub use events::{CacheMirror, StoreChange, StoreObserver, StoreSnapshot};
pub use ports::{cache_keys, ConnectivityFeed, FieldMap, LocalCache, RemoteStore};
pub use store::TransactionStore;
pub use summary::BalanceSummary;
pub use sync::{spawn_reconnect_watcher, SyncCoordinator};
