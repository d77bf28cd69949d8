//! Persistent-map storage.

use super::persistent::PersistentValue;
use super::StorageStrategy;
use crate::core::Path;

/// Storage over [`PersistentValue`] trees.
///
/// `set` never mutates: it returns a new root that shares every subtree off
/// the written path with the previous root.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmutableStrategy;

impl StorageStrategy for ImmutableStrategy {
    type State = PersistentValue;

    fn get(&self, root: &PersistentValue, path: &Path) -> Option<PersistentValue> {
        root.get_in(path.segments()).cloned()
    }

    fn set(&self, root: PersistentValue, path: &Path, value: PersistentValue) -> PersistentValue {
        root.set_in(path.segments(), value)
    }

    fn default_state(&self) -> PersistentValue {
        PersistentValue::map()
    }
}
