//! Reducer Builder: namespaced reducer composition
//!
//! Many small, pure transition functions are registered under dot-separated
//! namespace paths and combined into one top-level reducer, together with a
//! matching tree of bound action dispatchers.
//!
//! # Core Concepts
//!
//! - **Storage**: The [`StorageStrategy`] reads and writes sub-state, over
//!   plain JSON records or persistent structural-sharing maps
//! - **Registry**: [`ReducerBuilder`] maps full paths to transitions and
//!   namespaces to default sub-state
//! - **Composer**: [`ComposedReducer`] routes an action to its transition and
//!   writes the result back under the transition's namespace
//! - **Action tree**: [`ActionTree`] exposes one bound dispatcher per path
//!
//! # Example
//!
//! ```rust
//! use reducer_builder::builder::{ReducerBuilder, ReducerSet};
//! use reducer_builder::core::Action;
//! use reducer_builder::storage::PlainStrategy;
//! use reducer_builder::store::Store;
//! use serde_json::{json, Value};
//! use std::sync::Arc;
//!
//! let counter = ReducerSet::new()
//!     .initial_state(json!(0))
//!     .on("increment", |s: Value, a: &Action| json!(s.as_i64().unwrap_or(0) + a.payload_i64().unwrap_or(0)))
//!     .on("decrement", |s: Value, a: &Action| json!(s.as_i64().unwrap_or(0) - a.payload_i64().unwrap_or(0)));
//!
//! let builder = ReducerBuilder::new(PlainStrategy)
//!     .register_object(&counter, Some("count1"), None)?
//!     .register_object(&counter, Some("count2"), Some(json!(42)))?;
//!
//! let store = Arc::new(Store::new(builder.build_reducer(), None));
//! let actions = builder.build_action_tree_with(store.sink());
//!
//! actions.dispatch("count1.increment", 2)?;
//! actions.dispatch("count2.decrement", 12)?;
//!
//! assert_eq!(store.get_state(), json!({ "count1": 2, "count2": 30 }));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod actions;
pub mod builder;
pub mod compose;
pub mod core;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use crate::actions::{ActionTree, ActionTreeError, BoundAction, DispatchSink};
pub use crate::builder::{PrefixPolicy, ReducerBuilder, ReducerSet, RegistryConfig, RegistryError};
pub use crate::compose::{ComposedReducer, Reducer};
pub use crate::core::{Action, Path, Transition};
pub use crate::storage::{ImmutableStrategy, PersistentValue, PlainStrategy, StorageStrategy};
pub use crate::store::{Store, StoreConfig};
