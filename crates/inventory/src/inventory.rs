use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use satchel_core::{AggregateRoot, DomainResult, InventoryName, ItemId, Quantity};
use satchel_events::{ChangeNotifier, SubscriptionToken};

use crate::snapshot::{InventorySnapshot, SnapshotEntry};
use crate::stack::ItemStack;

/// How many units a newly created stack receives on `add`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewStackPolicy {
    /// A new stack starts at the requested amount.
    #[default]
    RequestedAmount,
    /// A new stack always starts at one unit; the rest of the requested amount
    /// is dropped. Only later adds to an existing stack honour the amount.
    SingleUnit,
}

impl core::str::FromStr for NewStackPolicy {
    type Err = satchel_core::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "requested" | "requested_amount" => Ok(Self::RequestedAmount),
            "single" | "single_unit" => Ok(Self::SingleUnit),
            other => Err(satchel_core::DomainError::validation(format!(
                "unknown new-stack policy '{other}'"
            ))),
        }
    }
}

/// Aggregate root: Inventory.
///
/// Holds item stacks in two structures that are always updated together:
/// - `index`: item id -> position in `order` (O(1) lookup)
/// - `order`: stacks in insertion order (stable iteration for presentation)
///
/// Every committed mutation bumps `version` and fires the change notifier
/// exactly once. The aggregate is synchronous and has no internal locking.
#[derive(Debug)]
pub struct Inventory {
    name: InventoryName,
    index: HashMap<ItemId, usize>,
    order: Vec<ItemStack>,
    notifier: ChangeNotifier,
    policy: NewStackPolicy,
    version: u64,
}

impl Inventory {
    /// Create an empty inventory with the default [`NewStackPolicy`].
    pub fn new(name: InventoryName) -> Self {
        Self::with_policy(name, NewStackPolicy::default())
    }

    pub fn with_policy(name: InventoryName, policy: NewStackPolicy) -> Self {
        Self {
            name,
            index: HashMap::new(),
            order: Vec::new(),
            notifier: ChangeNotifier::new(),
            policy,
            version: 0,
        }
    }

    pub fn name(&self) -> &InventoryName {
        &self.name
    }

    pub fn policy(&self) -> NewStackPolicy {
        self.policy
    }

    // ---- mutations ----

    /// Add `amount` units of `item`.
    ///
    /// Accepts an [`ItemId`] or a borrowed catalog record. Always notifies exactly once.
    pub fn add(&mut self, item: impl Into<ItemId>, amount: Quantity) {
        let item = item.into();
        let count = match self.index.get(&item) {
            Some(&slot) => {
                let stack = &mut self.order[slot];
                stack.increase(amount.get());
                stack.count()
            }
            None => {
                let mut stack = ItemStack::new(item);
                if self.policy == NewStackPolicy::RequestedAmount {
                    stack.increase(amount.get() - 1);
                }
                let count = stack.count();
                self.insert_stack(stack);
                count
            }
        };

        debug!(inventory = %self.name, %item, %amount, count, "item added");
        self.commit();
    }

    /// Remove `amount` units of `item`, evicting the stack once it drops below one unit.
    ///
    /// Returns `false` without notifying when the inventory holds no such item.
    pub fn remove(&mut self, item: impl Into<ItemId>, amount: Quantity) -> bool {
        let item = item.into();
        let Some(&slot) = self.index.get(&item) else {
            trace!(inventory = %self.name, %item, "remove of absent item ignored");
            return false;
        };

        let stack = &mut self.order[slot];
        stack.decrease(amount.get());
        let remaining = stack.count();
        let evicted = stack.is_depleted();
        if evicted {
            self.evict_at(slot);
        }

        debug!(inventory = %self.name, %item, %amount, remaining, evicted, "item removed");
        self.commit();
        true
    }

    /// Drop every stack. Notifies once, even when already empty.
    pub fn reset(&mut self) {
        self.index.clear();
        self.order.clear();
        debug!(inventory = %self.name, "inventory reset");
        self.commit();
    }

    /// Replace the whole content with a persisted snapshot.
    ///
    /// The snapshot is validated first; on error the inventory is left untouched
    /// and no notification fires. Returns the number of restored stacks.
    pub fn restore(&mut self, snapshot: &InventorySnapshot) -> DomainResult<usize> {
        snapshot.validate(&self.name)?;

        self.index.clear();
        self.order.clear();
        for entry in &snapshot.items {
            self.insert_stack(ItemStack::with_count(entry.item, entry.count));
        }

        let stacks = self.order.len();
        debug!(inventory = %self.name, stacks, "inventory restored");
        self.commit();
        Ok(stacks)
    }

    // ---- notifications ----

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionToken
    where
        F: FnMut() + Send + 'static,
    {
        self.notifier.subscribe(callback)
    }

    /// Idempotent; returns whether a subscription was actually removed.
    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        self.notifier.unsubscribe(token)
    }

    // ---- queries ----

    pub fn count_of(&self, item: impl Into<ItemId>) -> Option<i64> {
        self.index.get(&item.into()).map(|&slot| self.order[slot].count())
    }

    pub fn contains(&self, item: impl Into<ItemId>) -> bool {
        self.index.contains_key(&item.into())
    }

    /// Number of distinct stacks.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Stacks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemStack> + '_ {
        self.order.iter()
    }

    /// `(item, count)` pairs in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (ItemId, i64)> + '_ {
        self.order.iter().map(|s| (s.item(), s.count()))
    }

    /// Sum of all stack counts.
    pub fn total_units(&self) -> i64 {
        self.order.iter().map(ItemStack::count).sum()
    }

    pub fn snapshot(&self) -> InventorySnapshot {
        let items = self
            .order
            .iter()
            .map(|s| SnapshotEntry {
                item: s.item(),
                count: s.count(),
            })
            .collect();
        InventorySnapshot::new(self.name.clone(), items, Utc::now())
    }

    // ---- internals: the only places that touch `index` and `order` structurally ----

    fn insert_stack(&mut self, stack: ItemStack) {
        self.index.insert(stack.item(), self.order.len());
        self.order.push(stack);
    }

    fn evict_at(&mut self, slot: usize) {
        let stack = self.order.remove(slot);
        self.index.remove(&stack.item());
        for shifted in &self.order[slot..] {
            if let Some(pos) = self.index.get_mut(&shifted.item()) {
                *pos -= 1;
            }
        }
    }

    fn commit(&mut self) {
        self.version += 1;
        self.notifier.notify();
    }
}

impl AggregateRoot for Inventory {
    type Id = InventoryName;

    fn id(&self) -> &Self::Id {
        &self.name
    }

    fn version(&self) -> u64 {
        self.version
    }
}
