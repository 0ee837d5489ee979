//! Inventory persistence: save/load an [`Inventory`] through a [`KeyedStore`].
//!
//! Records are JSON-encoded [`InventorySnapshot`]s stored under
//! [`InventoryName::storage_key`]. The stack list is a JSON array, so the
//! save/load round trip reproduces stack order as well as counts.

use thiserror::Error;
use tracing::{info, warn};

use satchel_core::{InventoryName, ItemId};
use satchel_inventory::{Inventory, InventorySnapshot, NewStackPolicy};

use crate::store::{KeyedStore, StoreError};

/// Persistence failure surfaced from [`InventoryRepository`].
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The underlying store failed for non-data reasons.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A persisted record exists but cannot be restored.
    #[error("corrupt inventory record '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    /// The snapshot could not be encoded.
    #[error("failed to encode inventory snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result of [`InventoryRepository::load`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No record existed; the inventory was reset to empty.
    Empty,
    /// A record was restored with this many stacks.
    Restored { stacks: usize },
}

/// Saves and loads inventories by name.
#[derive(Debug, Clone)]
pub struct InventoryRepository<S> {
    store: S,
}

impl<S> InventoryRepository<S>
where
    S: KeyedStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persist the full content of `inventory` (in stack order).
    pub fn save(&self, inventory: &Inventory) -> Result<(), PersistenceError> {
        let key = inventory.name().storage_key();
        let snapshot = inventory.snapshot();
        let blob = serde_json::to_string_pretty(&snapshot)?;

        self.store.write(&key, &blob)?;

        info!(
            inventory = %inventory.name(),
            key = %key,
            stacks = snapshot.items.len(),
            "inventory saved"
        );
        Ok(())
    }

    /// Replace the content of `inventory` with its persisted record.
    ///
    /// - no record: the inventory is reset (one notification) and `Empty` is returned
    /// - valid record: content is fully replaced (one notification)
    /// - corrupt record or store failure: the inventory is left untouched
    pub fn load(&self, inventory: &mut Inventory) -> Result<LoadOutcome, PersistenceError> {
        let key = inventory.name().storage_key();

        let Some(blob) = self.read_record(&key)? else {
            info!(
                inventory = %inventory.name(),
                key = %key,
                "no persisted inventory; starting empty"
            );
            inventory.reset();
            return Ok(LoadOutcome::Empty);
        };

        let snapshot = decode(&key, &blob)?;
        let stacks = inventory.restore(&snapshot).map_err(|e| {
            warn!(
                inventory = %inventory.name(),
                key = %key,
                error = %e,
                "rejected persisted inventory"
            );
            PersistenceError::Corrupt {
                key: key.clone(),
                reason: e.to_string(),
            }
        })?;

        info!(inventory = %inventory.name(), key = %key, stacks, "inventory loaded");
        Ok(LoadOutcome::Restored { stacks })
    }

    /// Load into a freshly constructed inventory.
    pub fn load_new(
        &self,
        name: InventoryName,
        policy: NewStackPolicy,
    ) -> Result<Inventory, PersistenceError> {
        let mut inventory = Inventory::with_policy(name, policy);
        self.load(&mut inventory)?;
        Ok(inventory)
    }

    /// Remove the persisted record for `name`. Returns whether one existed.
    pub fn delete(&self, name: &InventoryName) -> Result<bool, PersistenceError> {
        Ok(self.store.delete(&name.storage_key())?)
    }

    /// Read a persisted record without touching any live inventory.
    pub fn peek(&self, name: &InventoryName) -> Result<Option<Vec<(ItemId, i64)>>, PersistenceError> {
        let key = name.storage_key();
        let Some(blob) = self.read_record(&key)? else {
            return Ok(None);
        };
        let snapshot = decode(&key, &blob)?;
        snapshot
            .validate(name)
            .map_err(|e| PersistenceError::Corrupt {
                key: key.clone(),
                reason: e.to_string(),
            })?;
        Ok(Some(
            snapshot.items.into_iter().map(|e| (e.item, e.count)).collect(),
        ))
    }

    /// Read a raw record. Bytes that are not text are corrupt data, not an IO failure.
    fn read_record(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match self.store.read(key) {
            Ok(blob) => Ok(blob),
            Err(StoreError::Undecodable { source, .. }) => {
                warn!(key, error = %source, "undecodable persisted inventory");
                Err(PersistenceError::Corrupt {
                    key: key.to_string(),
                    reason: source.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn decode(key: &str, blob: &str) -> Result<InventorySnapshot, PersistenceError> {
    serde_json::from_str(blob).map_err(|e| {
        warn!(key, error = %e, "unparseable persisted inventory");
        PersistenceError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        }
    })
}
