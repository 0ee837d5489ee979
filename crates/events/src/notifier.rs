//! Synchronous observer registry.
//!
//! An aggregate owns one [`ChangeNotifier`] and calls [`ChangeNotifier::notify`]
//! after every committed mutation. Each subscriber is a zero-argument callback.
//!
//! ## Delivery
//!
//! - **Synchronous**: callbacks run on the caller's thread before `notify` returns
//! - **Ordered**: callbacks run in subscription order
//! - **Exactly once per notify**: no debouncing, coalescing or retries
//!
//! Subscribers must be cheap. They cannot re-enter the owning aggregate: it is
//! mutably borrowed for the whole duration of `notify`.
//!
//! ## Usage Pattern
//!
//! ```ignore
//! let mut notifier = ChangeNotifier::new();
//! let token = notifier.subscribe(|| println!("changed"));
//! notifier.notify();
//! notifier.unsubscribe(token);
//! ```

/// Cancellation handle returned by [`ChangeNotifier::subscribe`].
///
/// Tokens are never reused within one notifier, so a stale token can never
/// remove somebody else's subscription.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionToken(u64);

impl core::fmt::Display for SubscriptionToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

type Callback = Box<dyn FnMut() + Send + 'static>;

/// Ordered list of change callbacks.
#[derive(Default)]
pub struct ChangeNotifier {
    subscribers: Vec<(SubscriptionToken, Callback)>,
    next_token: u64,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. It is invoked after every subsequent notification
    /// until the returned token is unsubscribed.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionToken
    where
        F: FnMut() + Send + 'static,
    {
        self.next_token += 1;
        let token = SubscriptionToken(self.next_token);
        self.subscribers.push((token, Box::new(callback)));
        tracing::trace!(%token, subscribers = self.subscribers.len(), "subscribed");
        token
    }

    /// Remove a subscription.
    ///
    /// Idempotent: returns `false` (and does nothing) when the token is unknown
    /// or was already removed.
    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        let Some(pos) = self.subscribers.iter().position(|(t, _)| *t == token) else {
            return false;
        };
        // `remove`, not `swap_remove`: delivery order must stay subscription order.
        self.subscribers.remove(pos);
        tracing::trace!(%token, subscribers = self.subscribers.len(), "unsubscribed");
        true
    }

    /// Invoke every subscriber once, in subscription order.
    pub fn notify(&mut self) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback();
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl core::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field(
                "subscribers",
                &self.subscribers.iter().map(|(t, _)| *t).collect::<Vec<_>>(),
            )
            .finish()
    }
}
