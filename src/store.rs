//! Reducer store
//!
//! A state container with a single update function and a subscriber list.
//! Stores are plain values passed by reference (usually an `Arc`) to whatever
//! reads or dispatches; there is no global instance.
//!
//! ```ignore
//! let store = Store::new(0_i64, |count: &i64, delta: i64| count + delta);
//! let id = store.subscribe(|count| println!("count = {count}"));
//! store.dispatch(5);
//! store.unsubscribe(id);
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};

type ReducerFn<S, A> = dyn Fn(&S, A) -> S + Send + Sync;
type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

// =============================================================================
// SubscriptionId
// =============================================================================

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

// =============================================================================
// Store
// =============================================================================

/// State container driven by a reducer `(&State, Action) -> State`.
pub struct Store<S, A> {
    state: RwLock<S>,
    reducer: Box<ReducerFn<S, A>>,
    listeners: Mutex<Vec<(SubscriptionId, Listener<S>)>>,
    next_id: AtomicU64,
    version: AtomicU64,
}

impl<S, A> Store<S, A> {
    /// Create a store with an initial state and a reducer.
    pub fn new(initial: S, reducer: impl Fn(&S, A) -> S + Send + Sync + 'static) -> Self {
        Self {
            state: RwLock::new(initial),
            reducer: Box::new(reducer),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
            version: AtomicU64::new(0),
        }
    }

    /// Execute a closure with read access to the current state.
    pub fn with_state<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let guard = self.state.read();
        f(&guard)
    }

    /// Number of actions dispatched so far.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Run the reducer, store the new state, then notify subscribers.
    ///
    /// Subscribers run after the state lock is released, so they may read
    /// the store or dispatch again.
    pub fn dispatch(&self, action: A)
    where
        S: Clone,
    {
        let snapshot = {
            let mut state = self.state.write();
            let next = (self.reducer)(&*state, action);
            *state = next;
            self.version.fetch_add(1, Ordering::AcqRel);
            state.clone()
        };

        let listeners: Vec<Listener<S>> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    /// Register a listener called with the new state after every dispatch.
    pub fn subscribe(&self, listener: impl Fn(&S) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.lock().len()
    }
}

impl<S: Clone, A> Store<S, A> {
    /// Clone of the current state.
    pub fn state(&self) -> S {
        self.state.read().clone()
    }
}

impl<S: fmt::Debug, A> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.state.read())
            .field("version", &self.version())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn counter() -> Store<i64, i64> {
        Store::new(0, |count: &i64, delta: i64| count + delta)
    }

    #[test]
    fn test_dispatch_runs_reducer() {
        let store = counter();
        store.dispatch(5);
        store.dispatch(-2);
        assert_eq!(store.state(), 3);
        assert_eq!(store.version(), 2);
        assert_eq!(store.with_state(|s| s * 10), 30);
    }

    #[test]
    fn test_subscribers_notified_in_order() {
        let store = counter();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&seen);
        store.subscribe(move |s| first.lock().push(("first", *s)));
        let second = Arc::clone(&seen);
        store.subscribe(move |s| second.lock().push(("second", *s)));

        store.dispatch(1);
        assert_eq!(*seen.lock(), vec![("first", 1), ("second", 1)]);
    }

    #[test]
    fn test_unsubscribe() {
        let store = counter();
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let id = store.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        store.dispatch(1);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.dispatch(1);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_listener_may_read_store() {
        let store = Arc::new(counter());
        let observed = Arc::new(AtomicUsize::new(0));

        let weak = Arc::downgrade(&store);
        let o = Arc::clone(&observed);
        store.subscribe(move |_| {
            if let Some(store) = weak.upgrade() {
                o.store(store.state() as usize, Ordering::SeqCst);
            }
        });

        store.dispatch(7);
        assert_eq!(observed.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_store_is_send_sync() {
        static_assertions::assert_impl_all!(Store<Vec<String>, String>: Send, Sync);
    }
}
