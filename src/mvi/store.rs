//! Owned state plus change broadcast.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use super::reducer::Reducer;

/// Holds a container's current state and runs intents through its reducer.
///
/// Subscribers are woken only when a transition actually changes the state.
pub struct Store<R: Reducer> {
    tx: Arc<watch::Sender<R::State>>,
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<R: Reducer> Default for Store<R> {
    fn default() -> Self {
        Self::new(R::State::default())
    }
}

impl<R: Reducer> Store<R> {
    pub fn new(initial: R::State) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Run `intent` through the reducer. Returns true if the state changed.
    pub fn dispatch(&self, intent: R::Intent) -> bool {
        self.tx.send_if_modified(|state| {
            let next = R::reduce(state.clone(), intent);
            if next == *state {
                false
            } else {
                *state = next;
                true
            }
        })
    }

    /// Read-only copy of the current state.
    pub fn snapshot(&self) -> R::State {
        self.tx.borrow().clone()
    }

    /// Borrow the current state for a quick read without cloning all of it.
    pub fn read<T>(&self, f: impl FnOnce(&R::State) -> T) -> T {
        f(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<R::State> {
        self.tx.subscribe()
    }
}

/// Monotonic tag for asynchronous operations.
///
/// Containers record the latest tag in state and drop responses that carry
/// an older one.
#[derive(Clone, Default)]
pub struct RequestCounter {
    next: Arc<AtomicU64>,
}

impl RequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next tag. The first call returns 1.
    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst) + 1
    }
}
