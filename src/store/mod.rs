//! A minimal reference state container.
//!
//! [`Store`] owns the canonical state, runs every dispatched action through
//! a [`Reducer`], notifies subscribers, and keeps a [`DispatchHistory`].
//! The reduce step and the history record of each dispatch happen under one
//! lock, so the reducer sees one action at a time and the history lists
//! actions in the order they were applied. Subscribers are called after the
//! lock is released: with concurrent dispatches a listener may be called
//! with states out of order, and should call [`Store::get_state`] when it
//! needs the latest one.

mod history;

pub use history::{DispatchHistory, DispatchRecord};

use crate::actions::DispatchSink;
use crate::compose::Reducer;
use crate::core::Action;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::trace;

/// Number of dispatch records a store keeps unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// Settings for a [`Store`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Keep at most this many dispatch records. `None` keeps all of them.
    pub history_limit: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}

impl StoreConfig {
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    /// Keep every dispatch record for the lifetime of the store.
    pub fn unbounded_history(mut self) -> Self {
        self.history_limit = None;
        self
    }
}

/// Handle returned by [`Store::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

struct Subscribers<S> {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener<S>)>,
}

/// State container driven by a reducer.
///
/// # Example
///
/// ```rust
/// use reducer_builder::builder::ReducerBuilder;
/// use reducer_builder::core::Action;
/// use reducer_builder::storage::PlainStrategy;
/// use reducer_builder::store::Store;
/// use serde_json::{json, Value};
/// use std::sync::Arc;
///
/// let builder = ReducerBuilder::new(PlainStrategy)
///     .register_function(|s: Value, _: &Action| json!(s.as_i64().unwrap_or(0) + 1), "inc")?;
///
/// let store = Arc::new(Store::new(builder.build_reducer(), Some(json!(4))));
/// let actions = builder.build_action_tree_with(store.sink());
/// actions.dispatch("inc", Value::Null)?;
///
/// assert_eq!(store.get_state(), json!(5));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Store<S> {
    reducer: Arc<dyn Reducer<S>>,
    state: Mutex<S>,
    subscribers: Mutex<Subscribers<S>>,
    history: Mutex<DispatchHistory>,
}

impl<S> Store<S>
where
    S: Clone + Send + 'static,
{
    /// Create a store and run the init action against `preloaded`.
    pub fn new<R>(reducer: R, preloaded: Option<S>) -> Self
    where
        R: Reducer<S> + 'static,
    {
        Self::with_config(reducer, preloaded, StoreConfig::default())
    }

    pub fn with_config<R>(reducer: R, preloaded: Option<S>, config: StoreConfig) -> Self
    where
        R: Reducer<S> + 'static,
    {
        let initial = reducer.reduce(preloaded, &Action::init());
        let history = match config.history_limit {
            Some(limit) => DispatchHistory::with_limit(limit),
            None => DispatchHistory::new(),
        };

        Self {
            reducer: Arc::new(reducer),
            state: Mutex::new(initial),
            subscribers: Mutex::new(Subscribers {
                next_id: 0,
                listeners: Vec::new(),
            }),
            history: Mutex::new(history),
        }
    }

    /// Run `action` through the reducer, then notify subscribers.
    pub fn dispatch(&self, action: Action) {
        let handled = self.reducer.handles(action.action_type());
        trace!(action_type = action.action_type(), handled, "store dispatch");

        let next = {
            let mut state = lock(&self.state);
            let next = self.reducer.reduce(Some(state.clone()), &action);
            *state = next.clone();
            lock(&self.history).push(DispatchRecord {
                action,
                timestamp: Utc::now(),
                handled,
            });
            next
        };

        let listeners: Vec<Listener<S>> = lock(&self.subscribers)
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&next);
        }
    }

    pub fn get_state(&self) -> S {
        lock(&self.state).clone()
    }

    /// Call `listener` with the new state after every dispatch.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        let mut subscribers = lock(&self.subscribers);
        let id = SubscriptionId(subscribers.next_id);
        subscribers.next_id += 1;
        subscribers.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = lock(&self.subscribers);
        let before = subscribers.listeners.len();
        subscribers.listeners.retain(|(existing, _)| *existing != id);
        subscribers.listeners.len() != before
    }

    pub fn history(&self) -> DispatchHistory {
        lock(&self.history).clone()
    }

    /// A dispatch sink feeding this store, for building action trees.
    pub fn sink(self: &Arc<Self>) -> DispatchSink {
        let store = Arc::clone(self);
        Arc::new(move |action: Action| store.dispatch(action))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
