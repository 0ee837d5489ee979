//! External catalog record for an item type.

use serde::{Deserialize, Serialize};

use crate::id::ItemId;

/// Immutable catalog record describing one item type.
///
/// Owned by the catalog collaborator. Two records with the same [`ItemId`]
/// describe the same item. Inventories refer to it by id (any inventory
/// operation also accepts `&ItemDefinition`) and never copy or mutate it.
/// The display fields only exist so that presentation layers can resolve
/// ids back to something printable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    id: ItemId,
    name: String,
    value: i64,
    description: String,
    icon: String,
}

impl ItemDefinition {
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        value: i64,
        description: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            value,
            description: description.into(),
            icon: icon.into(),
        }
    }

    pub fn item_id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Reference to the icon asset, opaque to the domain.
    pub fn icon(&self) -> &str {
        &self.icon
    }
}

impl From<&ItemDefinition> for ItemId {
    fn from(value: &ItemDefinition) -> Self {
        value.id
    }
}
