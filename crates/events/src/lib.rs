//! Change notification for domain aggregates.
//!
//! Unlike a message bus, notifications here carry no payload and are
//! delivered synchronously on the mutating caller's thread.

pub mod notifier;

pub use notifier::{ChangeNotifier, SubscriptionToken};
