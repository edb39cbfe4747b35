//! Shared traits and identifier generation for stored entities.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Exposes a stable identifier for entities held by the store.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

static LOCAL_ID_SEQ: AtomicU64 = AtomicU64::new(0);

/// Generates a locally-unique identifier token.
///
/// Identifiers are derived from the current Unix-epoch millisecond, with a
/// process-local sequence suffix so two entities created within the same
/// millisecond still receive distinct ids.
pub fn next_local_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let seq = LOCAL_ID_SEQ.fetch_add(1, Ordering::Relaxed) % 10_000;
    format!("{millis}{seq:04}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn local_ids_are_unique_within_a_burst() {
        let ids: HashSet<String> = (0..1_000).map(|_| next_local_id()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn local_ids_are_numeric_tokens() {
        let id = next_local_id();
        assert!(id.chars().all(|c| c.is_ascii_digit()));
        assert!(id.len() > 10);
    }
}
