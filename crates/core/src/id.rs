//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of an item type in the external catalog.
///
/// Inventories store these keys only; they never hold the catalog record itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Create a new identifier.
    ///
    /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
    /// for determinism.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for ItemId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<ItemId> for Uuid {
    fn from(value: ItemId) -> Self {
        value.0
    }
}

impl FromStr for ItemId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid =
            Uuid::from_str(s).map_err(|e| DomainError::invalid_id(format!("ItemId: {e}")))?;
        Ok(Self(uuid))
    }
}

/// Name of an inventory (the owner-facing identity of one bag of items).
///
/// Always trimmed and non-empty. The name doubles as the source of the
/// persistent storage key, see [`InventoryName::storage_key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InventoryName(String);

impl InventoryName {
    /// Prefix shared by every inventory storage key.
    pub const KEY_PREFIX: &'static str = "inventory.";

    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("inventory name cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Deterministic key under which this inventory is persisted.
    ///
    /// Characters in `[a-z0-9_-]` are kept; every other character (uppercase
    /// included, so keys stay distinct on case-insensitive filesystems) is
    /// written as `%XX` per UTF-8 byte. Distinct names always map to distinct keys.
    pub fn storage_key(&self) -> String {
        let mut key = String::with_capacity(Self::KEY_PREFIX.len() + self.0.len());
        key.push_str(Self::KEY_PREFIX);
        let mut utf8 = [0u8; 4];
        for c in self.0.chars() {
            match c {
                'a'..='z' | '0'..='9' | '_' | '-' => key.push(c),
                _ => {
                    for byte in c.encode_utf8(&mut utf8).bytes() {
                        key.push('%');
                        key.push_str(&hex::encode_upper([byte]));
                    }
                }
            }
        }
        key
    }
}

impl core::fmt::Display for InventoryName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for InventoryName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for InventoryName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<InventoryName> for String {
    fn from(value: InventoryName) -> Self {
        value.0
    }
}
