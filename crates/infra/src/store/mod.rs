//! Name-addressable blob storage.
//!
//! The repository writes one textual record per key. Backends only move
//! strings around; they know nothing about inventories.

pub mod file;
pub mod in_memory;
pub mod r#trait;

pub use file::FileStore;
pub use in_memory::InMemoryStore;
pub use r#trait::{KeyedStore, StoreError};
