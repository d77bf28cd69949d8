//! Namespaced Counters
//!
//! This example registers one counter reducer under two namespaces, builds
//! the composed reducer and the action tree, and drives a store with it.
//!
//! Key concepts:
//! - One reducer set reused under several namespaces
//! - Per-namespace default state
//! - Bound actions dispatching into a store
//!
//! Run with: RUST_LOG=debug cargo run --example counter

use reducer_builder::builder::{ReducerBuilder, ReducerSet, RegistryError};
use reducer_builder::core::Action;
use reducer_builder::storage::PlainStrategy;
use reducer_builder::store::Store;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn increment(state: Value, action: &Action) -> Value {
    json!(state.as_i64().unwrap_or(0) + action.payload_i64().unwrap_or(1))
}

fn decrement(state: Value, action: &Action) -> Value {
    json!(state.as_i64().unwrap_or(0) - action.payload_i64().unwrap_or(1))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Namespaced Counters Example ===\n");

    let counter = ReducerSet::new()
        .initial_state(json!(0))
        .on("increment", increment)
        .on("decrement", decrement);

    let builder = ReducerBuilder::new(PlainStrategy)
        .register_object(&counter, Some("count1"), None)?
        .register_object(&counter, Some("count2"), Some(json!(42)))?
        .register_function(|_: Value, _: &Action| json!(0), "reset.all")?;

    let store = Arc::new(Store::new(builder.build_reducer(), None));
    store.subscribe(|state: &Value| println!("  state -> {state}"));

    let actions = builder.build_action_tree_with(store.sink());
    println!("Top-level actions: {:?}", actions.root().keys().collect::<Vec<_>>());

    actions.dispatch("count1.increment", 2)?;
    actions.dispatch("count2.decrement", 12)?;

    // A registration error is reported, not panicked on.
    match ReducerBuilder::new(PlainStrategy).register_function(increment, "") {
        Err(RegistryError::InvalidNamespace) => println!("\nEmpty path rejected as expected"),
        other => println!("\nUnexpected result: {:?}", other.err()),
    }

    println!("\nFinal state: {}", store.get_state());
    println!("Dispatched: {:?}", store.history().action_types());

    println!("\n=== Example Complete ===");
    Ok(())
}
