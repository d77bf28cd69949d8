//! Persistent State
//!
//! This example uses the immutable strategy: every dispatch produces a new
//! root and earlier roots stay valid, sharing untouched subtrees.
//!
//! Run with: cargo run --example immutable_greeter

use reducer_builder::builder::{ReducerBuilder, ReducerSet};
use reducer_builder::core::Action;
use reducer_builder::storage::{ImmutableStrategy, PersistentValue};
use reducer_builder::store::Store;
use serde_json::json;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("=== Persistent State Example ===\n");

    let greeter = ReducerSet::new().on("greet", |state: PersistentValue, action: &Action| {
        let name = action.payload_str().unwrap_or("stranger");
        state.set("greeting", PersistentValue::from(format!("Hi, {name}")))
    });

    let builder = ReducerBuilder::new(ImmutableStrategy).register_object(&greeter, Some("greeter"), None)?;

    let preloaded = PersistentValue::from_json(json!({ "settings": { "theme": "dark" } }));
    let store = Arc::new(Store::new(builder.build_reducer(), Some(preloaded)));
    let actions = builder.build_action_tree_with(store.sink());

    let before = store.get_state();
    actions.dispatch("greeter.greet", "Leonard")?;
    let after = store.get_state();

    println!("Before: {}", before.to_json());
    println!("After:  {}", after.to_json());

    let shared = match (before.get("settings"), after.get("settings")) {
        (Some(PersistentValue::Map(a)), Some(PersistentValue::Map(b))) => a.ptr_eq(b),
        _ => false,
    };
    println!("Untouched subtree shared: {shared}");

    println!("\n=== Example Complete ===");
    Ok(())
}
