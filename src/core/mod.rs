//! Core types shared by every layer of the composition engine.
//!
//! - Namespace paths via [`Path`]
//! - Actions via [`Action`]
//! - Registered transition functions via [`Transition`]
//!
//! Everything here is pure data; nothing in this module touches state.

mod action;
mod path;

pub use action::{Action, INIT_ACTION_TYPE};
pub use path::{Path, PathError, DELIMITER};

use std::sync::Arc;

/// A pure state transition: `(sub_state, action) -> sub_state'`.
///
/// Transitions are shared between the registry and every reducer built from
/// it, so they are reference counted and must be thread-safe.
pub type Transition<S> = Arc<dyn Fn(S, &Action) -> S + Send + Sync>;
