//! Pluggable storage strategies for reading and writing namespaced sub-state.
//!
//! The composer never inspects the concrete state representation. It only
//! asks a [`StorageStrategy`] to read the value under a namespace, to write a
//! new value there, and to produce an empty root.
//!
//! Two strategies ship with the crate:
//!
//! - [`PlainStrategy`]: plain nested JSON records, written in place
//! - [`ImmutableStrategy`]: a structural-sharing [`PersistentValue`] tree,
//!   where every write yields a new root and leaves the old one intact
//!
//! Both satisfy the same contract: for any non-root path `p`,
//! `get(set(root, p, v), p) == Some(v)`, and values outside `p` are left
//! untouched by `set`.
//!
//! Arrays are addressed by canonical decimal segments (`0`, `1`, `12`, never
//! `01`). A write may replace an element or append one past the end. Any
//! other key written into an array turns it into an object keyed by the
//! element indices, so the existing elements survive. A missing or scalar
//! intermediate becomes an empty array when the next segment is `0` and an
//! empty object otherwise.

mod immutable;
mod persistent;
mod plain;

pub use immutable::ImmutableStrategy;
pub use persistent::{PersistentMap, PersistentValue};
pub use plain::PlainStrategy;

use crate::core::Path;
use std::fmt::Debug;

/// Parse `segment` as an array index.
///
/// Only canonical decimal forms are accepted, so `"01"` and `"+1"` stay
/// ordinary keys.
pub(crate) fn array_index(segment: &str) -> Option<usize> {
    let canonical = segment == "0"
        || (!segment.starts_with('0') && !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()));
    if canonical {
        segment.parse().ok()
    } else {
        None
    }
}

/// Get/set/default capability over a state representation.
///
/// `State::default()` plays the role of an undefined value: it is what a
/// transition receives when nothing is stored under its namespace and no
/// default was declared for it.
pub trait StorageStrategy: Send + Sync + 'static {
    /// Root (and sub-) state representation.
    type State: Clone + Default + Debug + Send + Sync + 'static;

    /// Read the value stored at `path`. Returns `None` when any segment is
    /// missing. The root path yields the whole state.
    fn get(&self, root: &Self::State, path: &Path) -> Option<Self::State>;

    /// Write `value` at `path`, creating intermediate containers as needed,
    /// and return the resulting root. Writing the root path replaces it.
    fn set(&self, root: Self::State, path: &Path, value: Self::State) -> Self::State;

    /// The empty root state.
    fn default_state(&self) -> Self::State;
}
