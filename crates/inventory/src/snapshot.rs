//! Persisted form of an inventory.
//!
//! A snapshot is the self-describing record written by the repository:
//! a format tag, the inventory name and the ordered `(item, count)` pairs.
//! [`InventorySnapshot::validate`] is the structural check applied on load.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use satchel_core::{DomainError, DomainResult, InventoryName, ItemId};

/// Current snapshot schema version.
pub const SNAPSHOT_FORMAT: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotEntry {
    pub item: ItemId,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InventorySnapshot {
    pub format: u32,
    pub name: InventoryName,
    pub saved_at: DateTime<Utc>,
    /// Stacks in inventory order.
    pub items: Vec<SnapshotEntry>,
}

impl InventorySnapshot {
    pub fn new(name: InventoryName, items: Vec<SnapshotEntry>, saved_at: DateTime<Utc>) -> Self {
        Self {
            format: SNAPSHOT_FORMAT,
            name,
            saved_at,
            items,
        }
    }

    /// Check that this snapshot can be restored into the inventory `expected`.
    pub fn validate(&self, expected: &InventoryName) -> DomainResult<()> {
        if self.format != SNAPSHOT_FORMAT {
            return Err(DomainError::validation(format!(
                "unsupported snapshot format {} (expected {SNAPSHOT_FORMAT})",
                self.format
            )));
        }
        if &self.name != expected {
            return Err(DomainError::invariant(format!(
                "snapshot belongs to inventory '{}', not '{}'",
                self.name, expected
            )));
        }

        let mut seen = HashSet::with_capacity(self.items.len());
        for entry in &self.items {
            if !seen.insert(entry.item) {
                return Err(DomainError::invariant(format!(
                    "duplicate stack for item {}",
                    entry.item
                )));
            }
            if entry.count < 1 {
                return Err(DomainError::invariant(format!(
                    "stack for item {} has non-positive count {}",
                    entry.item, entry.count
                )));
            }
        }
        Ok(())
    }
}
