//! Inventory domain module.
//!
//! This crate contains the inventory aggregate and its business rules,
//! implemented purely as deterministic domain logic (no IO, no storage).
//! Persistence lives in `satchel-infra`.

pub mod inventory;
pub mod snapshot;
pub mod stack;

pub use inventory::{Inventory, NewStackPolicy};
pub use snapshot::{InventorySnapshot, SNAPSHOT_FORMAT, SnapshotEntry};
pub use stack::ItemStack;
