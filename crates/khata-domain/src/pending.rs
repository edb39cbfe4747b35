//! Queue entry types for writes deferred while offline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// Indicates whether a queued addition has reached the remote store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Pending,
    Synced,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SyncStatus::Pending => "pending",
            SyncStatus::Synced => "synced",
        };
        f.write_str(label)
    }
}

/// An addition recorded locally because the remote write was skipped while
/// offline, awaiting replay. Queued deletions are bare id strings and need
/// no wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub status: SyncStatus,
}

impl PendingTransaction {
    pub fn pending(transaction: Transaction) -> Self {
        Self {
            transaction,
            status: SyncStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, SyncStatus::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, NewTransaction, TransactionKind};

    #[test]
    fn pending_entries_flatten_the_transaction_fields() {
        let txn = NewTransaction::new(
            "Rent",
            900.0,
            Category::with_id("4", "Bills"),
            TransactionKind::Expense,
        )
        .build();
        let entry = PendingTransaction::pending(txn.clone());
        let json = serde_json::to_value(&entry).expect("serialize");

        assert_eq!(json["id"], txn.id.as_str());
        assert_eq!(json["status"], "pending");
        assert!(json.get("transaction").is_none());
    }

    #[test]
    fn pending_entries_round_trip() {
        let txn = NewTransaction::new(
            "Loan to Asha",
            50.0,
            Category::with_id("1", "Food"),
            TransactionKind::Lend,
        )
        .with_person("Asha")
        .build();
        let entry = PendingTransaction::pending(txn);
        let json = serde_json::to_string(&entry).expect("serialize");
        let back: PendingTransaction = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, entry);
        assert!(back.is_pending());
    }
}
