//! Domain models for recorded transactions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::common::{next_local_id, Identifiable};

/// A single recorded money movement (or reminder).
///
/// The `id` is assigned locally when the transaction is created and is kept
/// even after the remote store acknowledges the write with its own document
/// id. Dates serialize as ISO-8601 strings, matching the remote field maps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<String>,
}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Supported transaction kinds, serialized lowercase on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
    Lend,
    Borrow,
    Reminder,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 5] = [
        TransactionKind::Expense,
        TransactionKind::Income,
        TransactionKind::Lend,
        TransactionKind::Borrow,
        TransactionKind::Reminder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
            TransactionKind::Lend => "lend",
            TransactionKind::Borrow => "borrow",
            TransactionKind::Reminder => "reminder",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction draft as captured from user input, before an id is
/// assigned.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub category: Category,
    pub kind: TransactionKind,
    pub person: Option<String>,
}

impl NewTransaction {
    pub fn new(
        title: impl Into<String>,
        amount: f64,
        category: Category,
        kind: TransactionKind,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            amount,
            date: Utc::now(),
            category,
            kind,
            person: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    pub fn with_person(mut self, person: impl Into<String>) -> Self {
        self.person = Some(person.into());
        self
    }

    /// Assigns a fresh local id and produces the stored transaction.
    pub fn build(self) -> Transaction {
        Transaction {
            id: next_local_id(),
            title: self.title,
            description: self.description,
            amount: self.amount,
            date: self.date,
            category: self.category,
            kind: self.kind,
            person: self.person,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        NewTransaction::new(
            "Groceries",
            42.5,
            Category::with_id("1", "Food"),
            TransactionKind::Expense,
        )
        .with_description("weekly shop")
        .build()
    }

    #[test]
    fn kinds_serialize_lowercase_under_the_type_key() {
        let json = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(json["type"], "expense");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let txn = NewTransaction::new(
            "Bus fare",
            2.0,
            Category::with_id("2", "Transportation"),
            TransactionKind::Expense,
        )
        .build();
        let json = serde_json::to_value(&txn).expect("serialize");

        assert!(json.get("description").is_none());
        assert!(json.get("person").is_none());
    }

    #[test]
    fn transactions_round_trip_through_json() {
        let txn = sample();
        let json = serde_json::to_string(&txn).expect("serialize");
        let back: Transaction = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, txn);
    }

    #[test]
    fn every_kind_round_trips_through_its_wire_label() {
        for kind in TransactionKind::ALL {
            let json = serde_json::to_string(&kind).expect("serialize");
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            let back: TransactionKind = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn dates_serialize_as_iso_8601_strings() {
        let json = serde_json::to_value(sample()).expect("serialize");
        let date = json["date"].as_str().expect("date is a string");
        assert!(date.contains('T'));
        date.parse::<DateTime<Utc>>().expect("parseable ISO-8601");
    }
}
