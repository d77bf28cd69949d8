//! Named groups of transitions registered together.

use crate::core::{Action, Transition};
use std::sync::Arc;

/// Reserved name that never becomes a transition path.
pub const INITIAL_STATE_KEY: &str = "initialState";

/// An ordered set of named transitions plus an optional initial state.
///
/// Registering a set under a namespace registers every transition at
/// `namespace.name`. The same set can be registered under any number of
/// namespaces.
///
/// # Example
///
/// ```rust
/// use reducer_builder::builder::ReducerSet;
/// use serde_json::{json, Value};
///
/// let counter: ReducerSet<Value> = ReducerSet::new()
///     .initial_state(json!(0))
///     .on("increment", |s: Value, a| json!(s.as_i64().unwrap_or(0) + a.payload_i64().unwrap_or(1)))
///     .on("decrement", |s: Value, a| json!(s.as_i64().unwrap_or(0) - a.payload_i64().unwrap_or(1)));
///
/// assert_eq!(counter.names().collect::<Vec<_>>(), vec!["increment", "decrement"]);
/// ```
pub struct ReducerSet<S> {
    entries: Vec<(String, Transition<S>)>,
    initial_state: Option<S>,
}

impl<S> ReducerSet<S> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            initial_state: None,
        }
    }

    /// Add a transition under `name`. Re-using a name replaces the earlier
    /// transition but keeps its position.
    pub fn on<F>(self, name: impl Into<String>, transition: F) -> Self
    where
        F: Fn(S, &Action) -> S + Send + Sync + 'static,
    {
        self.with_transition(name, Arc::new(transition))
    }

    /// Add an already shared transition under `name`.
    pub fn with_transition(mut self, name: impl Into<String>, transition: Transition<S>) -> Self {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = transition,
            None => self.entries.push((name, transition)),
        }
        self
    }

    /// Declare the state used when nothing is stored under the namespace yet.
    pub fn initial_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    pub fn declared_initial_state(&self) -> Option<&S> {
        self.initial_state.as_ref()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&str, &Transition<S>)> {
        self.entries.iter().map(|(name, t)| (name.as_str(), t))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S> Default for ReducerSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone> Clone for ReducerSet<S> {
    fn clone(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(name, t)| (name.clone(), Arc::clone(t)))
                .collect(),
            initial_state: self.initial_state.clone(),
        }
    }
}
