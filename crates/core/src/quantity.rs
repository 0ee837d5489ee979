//! Strictly positive amounts of an item.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// A strictly positive number of item units, used as the amount of an add or
/// remove operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub const ONE: Quantity = Quantity(1);

    pub fn new(units: u32) -> DomainResult<Self> {
        if units == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        Ok(Self(units))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl ValueObject for Quantity {}

impl TryFrom<u32> for Quantity {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_is_rejected() {
        let err = Quantity::new(0).unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("at least 1") => {}
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn zero_is_rejected_on_deserialize() {
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert_eq!(serde_json::from_str::<Quantity>("4").unwrap().get(), 4);
    }

    proptest! {
        /// Property: every positive value is accepted unchanged.
        #[test]
        fn positive_values_are_accepted(units in 1u32..=u32::MAX) {
            prop_assert_eq!(Quantity::new(units).unwrap().get(), units);
        }
    }
}
