//! `satchel-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the external item catalog record, quantities and the error model.

pub mod aggregate;
pub mod error;
pub mod id;
pub mod item;
pub mod quantity;
pub mod value_object;

pub use aggregate::AggregateRoot;
pub use error::{DomainError, DomainResult};
pub use id::{InventoryName, ItemId};
pub use item::ItemDefinition;
pub use quantity::Quantity;
pub use value_object::ValueObject;
