//! Explicitly constructed owner of one live inventory and its repository.
//!
//! A session is the service object callers pass around instead of a global
//! inventory manager: it is created with [`InventorySession::open`] and torn
//! down with [`InventorySession::close`], which persists the final state.

use satchel_core::{InventoryName, ItemId, Quantity};
use satchel_events::SubscriptionToken;
use satchel_inventory::{Inventory, NewStackPolicy};

use crate::repository::{InventoryRepository, LoadOutcome, PersistenceError};
use crate::store::KeyedStore;

#[derive(Debug)]
pub struct InventorySession<S> {
    repository: InventoryRepository<S>,
    inventory: Inventory,
}

impl<S> InventorySession<S>
where
    S: KeyedStore,
{
    /// Open `name`, loading its persisted state (an absent record yields an empty inventory).
    pub fn open(
        repository: InventoryRepository<S>,
        name: InventoryName,
        policy: NewStackPolicy,
    ) -> Result<Self, PersistenceError> {
        let inventory = repository.load_new(name, policy)?;
        Ok(Self {
            repository,
            inventory,
        })
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn repository(&self) -> &InventoryRepository<S> {
        &self.repository
    }

    pub fn add(&mut self, item: impl Into<ItemId>, amount: Quantity) {
        self.inventory.add(item, amount);
    }

    pub fn remove(&mut self, item: impl Into<ItemId>, amount: Quantity) -> bool {
        self.inventory.remove(item, amount)
    }

    pub fn reset(&mut self) {
        self.inventory.reset();
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionToken
    where
        F: FnMut() + Send + 'static,
    {
        self.inventory.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        self.inventory.unsubscribe(token)
    }

    pub fn save(&self) -> Result<(), PersistenceError> {
        self.repository.save(&self.inventory)
    }

    /// Discard in-memory changes and reload the persisted state.
    pub fn load(&mut self) -> Result<LoadOutcome, PersistenceError> {
        self.repository.load(&mut self.inventory)
    }

    /// Save and end the session, handing back the repository.
    pub fn close(self) -> Result<InventoryRepository<S>, PersistenceError> {
        self.repository.save(&self.inventory)?;
        tracing::debug!(inventory = %self.inventory.name(), "session closed");
        Ok(self.repository)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn bag() -> InventoryName {
        InventoryName::new("Bag").unwrap()
    }

    #[test]
    fn close_persists_and_reopen_restores() {
        let repo = InventoryRepository::new(InMemoryStore::new());
        let sword = ItemId::new();

        let mut session = InventorySession::open(repo, bag(), NewStackPolicy::default()).unwrap();
        assert!(session.inventory().is_empty());
        session.add(sword, Quantity::new(3).unwrap());
        let repo = session.close().unwrap();

        let session = InventorySession::open(repo, bag(), NewStackPolicy::default()).unwrap();
        assert_eq!(session.inventory().count_of(sword), Some(3));
    }

    #[test]
    fn load_discards_unsaved_changes() {
        let repo = InventoryRepository::new(InMemoryStore::new());
        let sword = ItemId::new();
        let mut session = InventorySession::open(repo, bag(), NewStackPolicy::default()).unwrap();
        session.add(sword, Quantity::ONE);
        session.save().unwrap();

        session.add(ItemId::new(), Quantity::ONE);
        session.remove(sword, Quantity::ONE);
        let fired = Arc::new(AtomicUsize::new(0));
        let f = fired.clone();
        let token = session.subscribe(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(session.load().unwrap(), LoadOutcome::Restored { stacks: 1 });
        assert_eq!(
            session.inventory().entries().collect::<Vec<_>>(),
            vec![(sword, 1)]
        );
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(session.unsubscribe(token));
    }
}
