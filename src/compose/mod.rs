//! The composed top-level reducer.
//!
//! A [`ComposedReducer`] resolves an action's type to a registered
//! transition, hands that transition the sub-state under its namespace, and
//! writes the result back through the storage strategy. Unregistered action
//! types leave the state untouched.

use crate::builder::registry::Registered;
use crate::core::{Action, Path};
use crate::storage::StorageStrategy;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Anything a state container can drive with actions.
///
/// Implemented by [`ComposedReducer`] and by plain closures of the form
/// `Fn(Option<S>, &Action) -> S`.
pub trait Reducer<S>: Send + Sync {
    /// Apply `action` to `state`. `None` stands for "no state yet".
    fn reduce(&self, state: Option<S>, action: &Action) -> S;

    /// Whether `action_type` has any effect. Defaults to `true`.
    fn handles(&self, _action_type: &str) -> bool {
        true
    }
}

impl<S, F> Reducer<S> for F
where
    F: Fn(Option<S>, &Action) -> S + Send + Sync,
{
    fn reduce(&self, state: Option<S>, action: &Action) -> S {
        self(state, action)
    }
}

/// Top-level transition function over a frozen snapshot of a registry.
pub struct ComposedReducer<St: StorageStrategy> {
    strategy: Arc<St>,
    transitions: Arc<IndexMap<String, Registered<St::State>>>,
    initial_states: Arc<HashMap<Path, St::State>>,
}

impl<St: StorageStrategy> ComposedReducer<St> {
    pub(crate) fn new(
        strategy: Arc<St>,
        transitions: Arc<IndexMap<String, Registered<St::State>>>,
        initial_states: Arc<HashMap<Path, St::State>>,
    ) -> Self {
        Self {
            strategy,
            transitions,
            initial_states,
        }
    }

    /// Apply `action` to `state`.
    ///
    /// A missing state is replaced by the strategy's empty state. An action
    /// whose type is not registered returns the input state as is. A panic
    /// inside a transition is not caught.
    pub fn reduce(&self, state: Option<St::State>, action: &Action) -> St::State {
        let state = state.unwrap_or_else(|| self.strategy.default_state());

        let Some(entry) = self.transitions.get(action.action_type()) else {
            trace!(action_type = action.action_type(), "unhandled action");
            return state;
        };

        if entry.namespace.is_root() {
            return (entry.transition)(state, action);
        }

        let sub_state = self.sub_state(&state, &entry.namespace);
        let next = (entry.transition)(sub_state, action);
        self.strategy.set(state, &entry.namespace, next)
    }

    /// Sub-state under `namespace`, falling back to its declared default and
    /// then to the undefined value.
    fn sub_state(&self, state: &St::State, namespace: &Path) -> St::State {
        self.strategy
            .get(state, namespace)
            .or_else(|| self.initial_states.get(namespace).cloned())
            .unwrap_or_default()
    }

    pub fn handles(&self, action_type: &str) -> bool {
        self.transitions.contains_key(action_type)
    }

    /// Registered action types in registration order.
    pub fn action_types(&self) -> impl Iterator<Item = &str> {
        self.transitions.keys().map(String::as_str)
    }

    pub fn strategy(&self) -> &St {
        &self.strategy
    }

    /// Turn this reducer into a bare closure.
    pub fn into_fn(self) -> impl Fn(Option<St::State>, &Action) -> St::State + Send + Sync {
        move |state, action| self.reduce(state, action)
    }
}

impl<St: StorageStrategy> Clone for ComposedReducer<St> {
    fn clone(&self) -> Self {
        Self {
            strategy: Arc::clone(&self.strategy),
            transitions: Arc::clone(&self.transitions),
            initial_states: Arc::clone(&self.initial_states),
        }
    }
}

impl<St: StorageStrategy> Reducer<St::State> for ComposedReducer<St> {
    fn reduce(&self, state: Option<St::State>, action: &Action) -> St::State {
        ComposedReducer::reduce(self, state, action)
    }

    fn handles(&self, action_type: &str) -> bool {
        ComposedReducer::handles(self, action_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{ReducerBuilder, ReducerSet};
    use crate::storage::{ImmutableStrategy, PersistentValue, PlainStrategy};
    use serde_json::{json, Value};

    fn add_payload(state: Value, action: &Action) -> Value {
        json!(state.as_i64().unwrap_or(0) + action.payload_i64().unwrap_or(1))
    }

    #[test]
    fn unknown_action_returns_state_unchanged() {
        let reducer = ReducerBuilder::new(ImmutableStrategy)
            .register_function(|s: PersistentValue, _: &Action| s, "known")
            .unwrap()
            .build_reducer();

        let state = PersistentValue::from_json(json!({ "a": { "b": 1 } }));
        let next = reducer.reduce(Some(state.clone()), &Action::new("unknown"));

        assert!(next.as_map().unwrap().ptr_eq(state.as_map().unwrap()));
    }

    #[test]
    #[should_panic(expected = "counter overflowed")]
    fn transition_panic_reaches_caller() {
        let reducer = ReducerBuilder::new(PlainStrategy)
            .register_object(
                &ReducerSet::new().on("increment", |_: Value, _: &Action| -> Value {
                    panic!("counter overflowed")
                }),
                Some("counter"),
                None,
            )
            .unwrap()
            .build_reducer();

        reducer.reduce(Some(json!({ "counter": 0 })), &Action::new("counter.increment"));
    }

    #[test]
    fn out_of_range_index_namespace_is_written_as_key() {
        let reducer = ReducerBuilder::new(PlainStrategy)
            .register_function(add_payload, "items.18446744073709551615.inc")
            .unwrap()
            .build_reducer();

        let state = reducer.reduce(
            Some(json!({ "items": [] })),
            &Action::new("items.18446744073709551615.inc"),
        );
        assert_eq!(state, json!({ "items": { "18446744073709551615": 1 } }));
    }

    #[test]
    fn missing_state_starts_from_default() {
        let reducer = ReducerBuilder::new(PlainStrategy).build_reducer();
        assert_eq!(reducer.reduce(None, &Action::init()), json!({}));
    }

    #[test]
    fn root_transition_replaces_whole_state() {
        let reducer = ReducerBuilder::new(PlainStrategy)
            .register_function(add_payload, "increment")
            .unwrap()
            .build_reducer();

        assert_eq!(reducer.reduce(Some(json!(4)), &Action::new("increment")), json!(5));

        let mut state = json!(0);
        for _ in 0..3 {
            state = reducer.reduce(Some(state), &Action::new("increment"));
        }
        assert_eq!(state, json!(3));
    }

    #[test]
    fn namespaced_transition_writes_back_leaving_siblings() {
        let reducer = ReducerBuilder::new(PlainStrategy)
            .register_object(&ReducerSet::new().on("increment", add_payload), Some("counter"), None)
            .unwrap()
            .build_reducer();

        let state = reducer.reduce(
            Some(json!({ "counter": 0, "other": "kept" })),
            &Action::with_payload("counter.increment", 2),
        );
        assert_eq!(state, json!({ "counter": 2, "other": "kept" }));
    }

    #[test]
    fn declared_default_used_when_namespace_missing() {
        let reducer = ReducerBuilder::new(PlainStrategy)
            .register_object(
                &ReducerSet::new().on("increment", add_payload),
                Some("count"),
                Some(json!(40)),
            )
            .unwrap()
            .build_reducer();

        let state = reducer.reduce(None, &Action::with_payload("count.increment", 2));
        assert_eq!(state, json!({ "count": 42 }));
    }

    #[test]
    fn undeclared_namespace_passes_undefined_through() {
        let reducer = ReducerBuilder::new(PlainStrategy)
            .register_function(
                |s: Value, _: &Action| json!({ "was_null": s.is_null() }),
                "never.declared",
            )
            .unwrap()
            .build_reducer();

        let state = reducer.reduce(None, &Action::new("never.declared"));
        assert_eq!(state, json!({ "never": { "was_null": true } }));
    }

    #[test]
    fn stored_value_wins_over_default() {
        let reducer = ReducerBuilder::new(PlainStrategy)
            .register_object(
                &ReducerSet::new().on("increment", add_payload).initial_state(json!(-23)),
                Some("count3"),
                None,
            )
            .unwrap()
            .build_reducer();

        let state = reducer.reduce(Some(json!({ "count3": 11 })), &Action::new("count3.increment"));
        assert_eq!(state, json!({ "count3": 12 }));
    }

    #[test]
    fn reducer_is_a_snapshot() {
        let builder = ReducerBuilder::new(PlainStrategy)
            .register_function(add_payload, "a")
            .unwrap();
        let before = builder.build_reducer();
        let builder = builder.register_function(add_payload, "b").unwrap();
        let after = builder.build_reducer();

        assert!(!before.handles("b"));
        assert!(after.handles("b"));
        assert_eq!(before.reduce(Some(json!(1)), &Action::new("b")), json!(1));
        assert_eq!(after.reduce(Some(json!(1)), &Action::new("b")), json!(2));
    }

    #[test]
    fn into_fn_behaves_like_reduce() {
        let reducer = ReducerBuilder::new(PlainStrategy)
            .register_function(add_payload, "inc")
            .unwrap()
            .build_reducer();
        let action_types: Vec<String> = reducer.action_types().map(str::to_owned).collect();
        let f = reducer.into_fn();

        assert_eq!(action_types, vec!["inc".to_string()]);
        assert_eq!(f(Some(json!(1)), &Action::new("inc")), json!(2));
    }

    #[test]
    fn closures_implement_reducer() {
        let f = |state: Option<i64>, _: &Action| state.unwrap_or(0) + 1;
        assert_eq!(Reducer::reduce(&f, Some(1), &Action::new("x")), 2);
        assert!(Reducer::<i64>::handles(&f, "anything"));
    }
}
