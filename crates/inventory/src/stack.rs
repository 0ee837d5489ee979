use satchel_core::ItemId;

/// A count of units of one item type held together.
///
/// Stacks are only mutated by the owning [`crate::Inventory`]; the mutators are
/// crate-private so callers outside the aggregate can read but never change them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    item: ItemId,
    count: i64,
}

impl ItemStack {
    /// A fresh stack always starts with exactly one unit.
    pub(crate) fn new(item: ItemId) -> Self {
        Self { item, count: 1 }
    }

    /// Rebuild a stack from persisted state. The count is validated by the caller.
    pub(crate) fn with_count(item: ItemId, count: i64) -> Self {
        Self { item, count }
    }

    pub fn item(&self) -> ItemId {
        self.item
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub(crate) fn increase(&mut self, amount: u32) {
        self.count = self.count.saturating_add(i64::from(amount));
    }

    /// Does not clamp: the count may go to zero or below, and evicting the
    /// stack is then the aggregate's job.
    pub(crate) fn decrease(&mut self, amount: u32) {
        self.count = self.count.saturating_sub(i64::from(amount));
    }

    pub fn is_depleted(&self) -> bool {
        self.count < 1
    }
}
