//! Domain types representing transaction categories.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::{next_local_id, Identifiable, NamedEntity};

/// Categorises transactions for filtering and reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: next_local_id(),
            name: name.into(),
        }
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Returns the fixed seed set applied on first run when no categories
    /// exist locally.
    pub fn default_set() -> Vec<Category> {
        [
            ("1", "Food"),
            ("2", "Transportation"),
            ("3", "Entertainment"),
            ("4", "Bills"),
            ("5", "Salary"),
        ]
        .into_iter()
        .map(|(id, name)| Category::with_id(id, name))
        .collect()
    }
}

impl Identifiable for Category {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
