//! Builder API for registering namespaced transitions.
//!
//! Transitions are registered one at a time with
//! [`ReducerBuilder::register_function`] or in named groups with
//! [`ReducerBuilder::register_object`]. The builder then produces the
//! composed reducer and the bound action tree from the same registrations.

pub mod config;
pub mod error;
pub mod registry;
pub mod set;
pub mod validation;

pub use config::{PrefixPolicy, RegistryConfig};
pub use error::{EntryViolation, RegistryError};
pub use registry::ReducerBuilder;
pub use set::{ReducerSet, INITIAL_STATE_KEY};
pub use validation::RegistrationCheck;
