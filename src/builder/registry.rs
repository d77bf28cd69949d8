//! The reducer registry and its fluent builder.

use crate::actions::{ActionTree, DispatchSink};
use crate::builder::config::RegistryConfig;
use crate::builder::error::{EntryViolation, RegistryError};
use crate::builder::set::{ReducerSet, INITIAL_STATE_KEY};
use crate::builder::validation::{self, RegistrationCheck};
use crate::compose::ComposedReducer;
use crate::core::{Action, Path, PathError, Transition};
use crate::storage::StorageStrategy;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use stillwater::validation::Validation;
use tracing::{debug, warn};

/// A transition together with the namespace it reads and writes.
pub(crate) struct Registered<S> {
    pub(crate) path: Path,
    pub(crate) namespace: Path,
    pub(crate) transition: Transition<S>,
}

impl<S> Clone for Registered<S> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            namespace: self.namespace.clone(),
            transition: Arc::clone(&self.transition),
        }
    }
}

/// Registry of namespaced transitions, built up with chained calls.
///
/// Paths keep their first registration order, which is the order the
/// action tree is built in. Registering a path again replaces its
/// transition.
///
/// # Example
///
/// ```rust
/// use reducer_builder::builder::{ReducerBuilder, ReducerSet};
/// use reducer_builder::core::Action;
/// use reducer_builder::storage::PlainStrategy;
/// use serde_json::{json, Value};
///
/// let counter = ReducerSet::new()
///     .on("increment", |s: Value, a| json!(s.as_i64().unwrap_or(0) + a.payload_i64().unwrap_or(0)))
///     .on("decrement", |s: Value, a| json!(s.as_i64().unwrap_or(0) - a.payload_i64().unwrap_or(0)));
///
/// let builder = ReducerBuilder::new(PlainStrategy)
///     .register_object(&counter, Some("count1"), Some(json!(0)))?
///     .register_object(&counter, Some("count2"), Some(json!(42)))?;
///
/// let reducer = builder.build_reducer();
/// let state = reducer.reduce(None, &Action::with_payload("count1.increment", 2));
/// let state = reducer.reduce(Some(state), &Action::with_payload("count2.decrement", 12));
///
/// assert_eq!(state, json!({ "count1": 2, "count2": 30 }));
/// # Ok::<(), reducer_builder::builder::RegistryError>(())
/// ```
pub struct ReducerBuilder<St: StorageStrategy> {
    strategy: Arc<St>,
    config: RegistryConfig,
    transitions: IndexMap<String, Registered<St::State>>,
    initial_states: HashMap<Path, St::State>,
}

impl<St: StorageStrategy> ReducerBuilder<St> {
    /// Create an empty registry over the given storage strategy.
    pub fn new(strategy: St) -> Self {
        Self::with_config(strategy, RegistryConfig::default())
    }

    pub fn with_config(strategy: St, config: RegistryConfig) -> Self {
        Self {
            strategy: Arc::new(strategy),
            config,
            transitions: IndexMap::new(),
            initial_states: HashMap::new(),
        }
    }

    /// Register a single transition at its full path.
    ///
    /// Fails with [`RegistryError::InvalidNamespace`] when `path` is empty.
    pub fn register_function<F>(self, transition: F, path: &str) -> Result<Self, RegistryError>
    where
        F: Fn(St::State, &Action) -> St::State + Send + Sync + 'static,
    {
        self.register_transition(Arc::new(transition), path)
    }

    /// Register an already shared transition at its full path.
    pub fn register_transition(
        mut self,
        transition: Transition<St::State>,
        path: &str,
    ) -> Result<Self, RegistryError> {
        let path = Path::parse(path).map_err(|err| match err {
            PathError::Empty => RegistryError::InvalidNamespace,
            PathError::EmptySegment { path } => RegistryError::Rejected {
                violations: vec![EntryViolation::EmptySegment { path }],
            },
        })?;

        let check = validation::check_prefix(self.config.prefix_policy, &path, self.registered_paths());
        let violations = validation::into_violations(check);
        if !violations.is_empty() {
            return Err(RegistryError::Rejected { violations });
        }

        self.insert(path, transition);
        Ok(self)
    }

    /// Register every transition in `set` under `namespace`.
    ///
    /// The default state recorded for the namespace is, in priority order,
    /// `explicit_default`, the set's declared initial state, or the
    /// strategy's empty state. `None` (or `""`) as namespace means the root.
    ///
    /// Every entry is checked before anything is registered; a rejected
    /// batch reports all of its violations and leaves the registry as it was.
    pub fn register_object(
        mut self,
        set: &ReducerSet<St::State>,
        namespace: Option<&str>,
        explicit_default: Option<St::State>,
    ) -> Result<Self, RegistryError> {
        let namespace = Path::parse_namespace(namespace).map_err(|err| match err {
            PathError::Empty => RegistryError::InvalidNamespace,
            PathError::EmptySegment { path } => RegistryError::Rejected {
                violations: vec![EntryViolation::EmptySegment { path }],
            },
        })?;

        let mut checks: Vec<RegistrationCheck> = Vec::new();
        let mut resolved: Vec<(Path, Transition<St::State>)> = Vec::new();

        for (name, transition) in set.entries() {
            if name == INITIAL_STATE_KEY {
                warn!(namespace = %namespace, "skipping transition registered under reserved name");
                continue;
            }

            match validation::resolve_entry(&namespace, name) {
                Ok(path) => {
                    let earlier = resolved.iter().map(|(p, _)| p);
                    checks.push(validation::check_prefix(
                        self.config.prefix_policy,
                        &path,
                        self.registered_paths().chain(earlier),
                    ));
                    resolved.push((path, Arc::clone(transition)));
                }
                Err(violation) => checks.push(Validation::fail(violation)),
            }
        }

        let violations = validation::into_violations(Validation::all_vec(checks).map(|_| ()));
        if !violations.is_empty() {
            return Err(RegistryError::Rejected { violations });
        }

        for (path, transition) in resolved {
            self.insert(path, transition);
        }

        let default = explicit_default
            .or_else(|| set.declared_initial_state().cloned())
            .unwrap_or_else(|| self.strategy.default_state());
        self.record_initial_state(namespace, default);

        Ok(self)
    }

    /// Declare the default state for a namespace without registering any
    /// transition. `None` leaves any existing default untouched.
    pub fn initial_state(
        mut self,
        namespace: Option<&str>,
        state: Option<St::State>,
    ) -> Result<Self, RegistryError> {
        let namespace = Path::parse_namespace(namespace).map_err(|_| RegistryError::InvalidNamespace)?;
        if let Some(state) = state {
            self.record_initial_state(namespace, state);
        }
        Ok(self)
    }

    /// Build the composed transition function from the current registrations.
    ///
    /// The result is a snapshot: later registrations on this builder do not
    /// affect it.
    pub fn build_reducer(&self) -> ComposedReducer<St> {
        ComposedReducer::new(
            Arc::clone(&self.strategy),
            Arc::new(self.transitions.clone()),
            Arc::new(self.initial_states.clone()),
        )
    }

    /// Build a tree of bound action dispatchers, one per registered path.
    pub fn build_action_tree<F>(&self, sink: F) -> ActionTree
    where
        F: Fn(Action) + Send + Sync + 'static,
    {
        self.build_action_tree_with(Arc::new(sink))
    }

    pub fn build_action_tree_with(&self, sink: DispatchSink) -> ActionTree {
        ActionTree::build(self.registered_paths(), sink)
    }

    /// Check the whole registry for paths that are strict prefixes of one
    /// another. Only meaningful under
    /// [`PrefixPolicy::Allow`](crate::builder::PrefixPolicy::Allow), since the
    /// reject policy never lets such pairs in.
    pub fn validate(&self) -> RegistrationCheck {
        let paths: Vec<&Path> = self.registered_paths().collect();
        validation::check_all_prefixes(&paths)
    }

    /// Registered paths in registration order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.transitions.keys().map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.transitions.contains_key(path)
    }

    /// Default state recorded for a namespace (`""` for the root).
    pub fn declared_initial_state(&self, namespace: &str) -> Option<&St::State> {
        let namespace = Path::parse_namespace(Some(namespace)).ok()?;
        self.initial_states.get(&namespace)
    }

    pub fn strategy(&self) -> &St {
        &self.strategy
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    fn registered_paths(&self) -> impl Iterator<Item = &Path> {
        self.transitions.values().map(|entry| &entry.path)
    }

    fn insert(&mut self, path: Path, transition: Transition<St::State>) {
        let key = path.to_string();
        let namespace = path.namespace();

        if self.transitions.contains_key(&key) {
            if self.config.warn_on_overwrite {
                warn!(path = %key, "replacing registered transition");
            } else {
                debug!(path = %key, "replacing registered transition");
            }
        } else {
            debug!(path = %key, namespace = %namespace, "registered transition");
        }

        // IndexMap::insert keeps the original position of an existing key.
        self.transitions.insert(
            key,
            Registered {
                path,
                namespace,
                transition,
            },
        );
    }

    fn record_initial_state(&mut self, namespace: Path, state: St::State) {
        debug!(namespace = %namespace, "recorded default state");
        self.initial_states.insert(namespace, state);
    }
}

impl<St: StorageStrategy + Default> Default for ReducerBuilder<St> {
    fn default() -> Self {
        Self::new(St::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::config::PrefixPolicy;
    use crate::storage::PlainStrategy;
    use serde_json::{json, Value};

    fn increment(state: Value, action: &Action) -> Value {
        json!(state.as_i64().unwrap_or(0) + action.payload_i64().unwrap_or(1))
    }

    fn decrement(state: Value, action: &Action) -> Value {
        json!(state.as_i64().unwrap_or(0) - action.payload_i64().unwrap_or(1))
    }

    fn counter() -> ReducerSet<Value> {
        ReducerSet::new().on("increment", increment).on("decrement", decrement)
    }

    #[test]
    fn register_function_requires_a_path() {
        let result = ReducerBuilder::new(PlainStrategy).register_function(increment, "");
        assert!(matches!(result, Err(RegistryError::InvalidNamespace)));
    }

    #[test]
    fn register_function_rejects_empty_segments() {
        let result = ReducerBuilder::new(PlainStrategy).register_function(increment, "a..b");
        let err = result.err().unwrap();
        assert_eq!(
            err.violations(),
            &[EntryViolation::EmptySegment {
                path: "a..b".to_string()
            }]
        );
    }

    #[test]
    fn register_object_builds_namespaced_paths() {
        let builder = ReducerBuilder::new(PlainStrategy)
            .register_object(&counter(), Some("deep.counter"), None)
            .unwrap();

        assert_eq!(
            builder.paths().collect::<Vec<_>>(),
            vec!["deep.counter.increment", "deep.counter.decrement"]
        );
    }

    #[test]
    fn register_object_without_namespace_registers_at_root() {
        let builder = ReducerBuilder::new(PlainStrategy)
            .register_object(&ReducerSet::new().on("increment", increment), None, None)
            .unwrap()
            .register_object(&ReducerSet::new().on("decrement", decrement), None, None)
            .unwrap();

        assert_eq!(builder.paths().collect::<Vec<_>>(), vec!["increment", "decrement"]);
        assert_eq!(builder.declared_initial_state(""), Some(&json!({})));
    }

    #[test]
    fn reserved_initial_state_name_is_skipped() {
        let set = counter().on(INITIAL_STATE_KEY, increment);
        let builder = ReducerBuilder::new(PlainStrategy)
            .register_object(&set, Some("c"), None)
            .unwrap();

        assert!(!builder.contains("c.initialState"));
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn default_state_priority() {
        let builder = ReducerBuilder::new(PlainStrategy)
            .register_object(&counter().initial_state(json!(0)), Some("count1"), None)
            .unwrap()
            .register_object(&counter().initial_state(json!(0)), Some("count2"), Some(json!(42)))
            .unwrap()
            .register_object(&counter(), Some("count3"), None)
            .unwrap();

        assert_eq!(builder.declared_initial_state("count1"), Some(&json!(0)));
        assert_eq!(builder.declared_initial_state("count2"), Some(&json!(42)));
        assert_eq!(builder.declared_initial_state("count3"), Some(&json!({})));
        assert_eq!(builder.declared_initial_state("count4"), None);
    }

    #[test]
    fn initial_state_records_only_present_values() {
        let builder = ReducerBuilder::new(PlainStrategy)
            .initial_state(Some("a"), Some(json!(1)))
            .unwrap()
            .initial_state(Some("a"), None)
            .unwrap();
        assert_eq!(builder.declared_initial_state("a"), Some(&json!(1)));
        assert!(builder.is_empty());
    }

    #[test]
    fn re_registration_keeps_order_and_replaces() {
        let builder = ReducerBuilder::new(PlainStrategy)
            .register_function(increment, "a")
            .unwrap()
            .register_function(decrement, "b")
            .unwrap()
            .register_function(decrement, "a")
            .unwrap();

        assert_eq!(builder.paths().collect::<Vec<_>>(), vec!["a", "b"]);
        let reducer = builder.build_reducer();
        assert_eq!(reducer.reduce(Some(json!(5)), &Action::new("a")), json!(4));
    }

    #[test]
    fn reject_policy_refuses_prefix_paths() {
        let config = RegistryConfig::new().prefix_policy(PrefixPolicy::Reject);
        let builder = ReducerBuilder::with_config(PlainStrategy, config)
            .register_function(increment, "a.b")
            .unwrap();

        let err = builder.register_function(increment, "a.b.c").err().unwrap();
        assert!(matches!(
            err.violations(),
            [EntryViolation::PrefixConflict { .. }]
        ));
    }

    #[test]
    fn rejected_batch_reports_every_violation_and_registers_nothing() {
        let config = RegistryConfig::new().prefix_policy(PrefixPolicy::Reject);
        let set = ReducerSet::new()
            .on("", increment)
            .on("x..y", increment)
            .on("ok", increment)
            .on("ok.nested", increment);

        let result = ReducerBuilder::with_config(PlainStrategy, config).register_object(&set, Some("ns"), None);

        let err = result.err().unwrap();
        let violations = err.violations();
        assert_eq!(violations.len(), 3);
        assert!(violations.contains(&EntryViolation::EmptyName));
        assert!(violations.contains(&EntryViolation::EmptySegment {
            path: "ns.x..y".to_string()
        }));
        assert!(violations.contains(&EntryViolation::PrefixConflict {
            path: "ns.ok.nested".to_string(),
            existing: "ns.ok".to_string(),
        }));
    }

    #[test]
    fn validate_reports_prefix_pairs_under_allow() {
        let builder = ReducerBuilder::new(PlainStrategy)
            .register_function(increment, "a.b")
            .unwrap()
            .register_function(increment, "a.b.c")
            .unwrap();

        assert!(builder.validate().is_failure());

        let clean = ReducerBuilder::new(PlainStrategy)
            .register_object(&counter(), Some("count1"), None)
            .unwrap();
        assert!(clean.validate().is_success());
    }

    #[test]
    fn default_builder_uses_default_strategy() {
        let builder: ReducerBuilder<PlainStrategy> = ReducerBuilder::default();
        assert!(builder.is_empty());
        assert_eq!(builder.config(), &RegistryConfig::default());
    }
}
