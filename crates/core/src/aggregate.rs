//! Aggregate root trait for domain models that own their consistency boundary.

/// Aggregate root marker + minimal interface.
///
/// This is intentionally small: aggregates decide how they model state
/// transitions without bringing in any infrastructure concerns.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state.
    ///
    /// Incremented once per committed mutation, so observers can tell whether
    /// anything changed between two reads.
    fn version(&self) -> u64;
}
