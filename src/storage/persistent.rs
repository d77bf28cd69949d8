//! Persistent, structural-sharing state values.
//!
//! A [`PersistentValue`] is a JSON scalar, a list, or a [`PersistentMap`].
//! Lists and maps are reference counted and never mutated once shared:
//! every write copies only the containers along the written path and reuses
//! every other subtree, so older roots stay valid for anyone still holding
//! them.

use super::array_index;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// An immutable map from keys to persistent values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PersistentMap {
    entries: Arc<BTreeMap<String, PersistentValue>>,
}

impl PersistentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&PersistentValue> {
        self.entries.get(key)
    }

    /// Return a new map with `key` bound to `value`.
    ///
    /// The receiver is left unchanged; the two maps share every other entry.
    pub fn insert(&self, key: impl Into<String>, value: PersistentValue) -> Self {
        let mut entries = BTreeMap::clone(&self.entries);
        entries.insert(key.into(), value);
        Self {
            entries: Arc::new(entries),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PersistentValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when both maps are the same shared allocation.
    pub fn ptr_eq(&self, other: &PersistentMap) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl FromIterator<(String, PersistentValue)> for PersistentMap {
    fn from_iter<I: IntoIterator<Item = (String, PersistentValue)>>(iter: I) -> Self {
        Self {
            entries: Arc::new(iter.into_iter().collect()),
        }
    }
}

/// A node of a persistent state tree.
///
/// `PersistentValue::default()` is the JSON `null` scalar, which stands for
/// "no value".
///
/// # Example
///
/// ```rust
/// use reducer_builder::storage::PersistentValue;
/// use serde_json::json;
///
/// let before = PersistentValue::from_json(json!({ "deep": { "counter": 0 }, "other": [1, 2] }));
/// let after = before.set_in(&["deep".into(), "counter".into()], PersistentValue::from(2));
///
/// assert_eq!(before.to_json(), json!({ "deep": { "counter": 0 }, "other": [1, 2] }));
/// assert_eq!(after.to_json(), json!({ "deep": { "counter": 2 }, "other": [1, 2] }));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum PersistentValue {
    Scalar(Value),
    List(Arc<Vec<PersistentValue>>),
    Map(PersistentMap),
}

impl Default for PersistentValue {
    fn default() -> Self {
        PersistentValue::Scalar(Value::Null)
    }
}

impl PersistentValue {
    /// An empty map value.
    pub fn map() -> Self {
        PersistentValue::Map(PersistentMap::new())
    }

    /// Convert a JSON value, turning every object into a persistent map and
    /// every array into a persistent list.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(fields) => PersistentValue::Map(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, PersistentValue::from_json(v)))
                    .collect(),
            ),
            Value::Array(items) => PersistentValue::List(Arc::new(
                items.into_iter().map(PersistentValue::from_json).collect(),
            )),
            other => PersistentValue::Scalar(other),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            PersistentValue::Scalar(value) => value.clone(),
            PersistentValue::List(items) => Value::Array(items.iter().map(PersistentValue::to_json).collect()),
            PersistentValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.to_owned(), v.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }

    pub fn as_map(&self) -> Option<&PersistentMap> {
        match self {
            PersistentValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            PersistentValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_scalar().and_then(Value::as_i64)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Value::as_str)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PersistentValue::Scalar(Value::Null))
    }

    /// Look up a direct child: a map entry, or a list element by index.
    pub fn get(&self, key: &str) -> Option<&PersistentValue> {
        match self {
            PersistentValue::Map(map) => map.get(key),
            PersistentValue::List(items) => array_index(key).and_then(|i| items.get(i)),
            PersistentValue::Scalar(_) => None,
        }
    }

    /// Look up a nested value by key path. An empty key path yields `self`.
    pub fn get_in(&self, keys: &[String]) -> Option<&PersistentValue> {
        keys.iter().try_fold(self, |node, key| node.get(key))
    }

    /// Return a new value with `key` bound to `value`.
    ///
    /// A list accepts an existing index or the next one past its end; any
    /// other key turns it into a map keyed by element index. A scalar
    /// receiver is treated as an empty list for key `0` and as an empty map
    /// otherwise.
    pub fn set(&self, key: impl Into<String>, value: PersistentValue) -> Self {
        let key = key.into();
        match self {
            PersistentValue::Map(map) => PersistentValue::Map(map.insert(key, value)),
            PersistentValue::List(items) => match array_index(&key) {
                Some(index) if index <= items.len() => {
                    let mut items = Vec::clone(items);
                    if index == items.len() {
                        items.push(value);
                    } else {
                        items[index] = value;
                    }
                    PersistentValue::List(Arc::new(items))
                }
                _ => {
                    let map: PersistentMap = items
                        .iter()
                        .enumerate()
                        .map(|(i, item)| (i.to_string(), item.clone()))
                        .collect();
                    PersistentValue::Map(map.insert(key, value))
                }
            },
            PersistentValue::Scalar(_) if array_index(&key) == Some(0) => {
                PersistentValue::List(Arc::new(vec![value]))
            }
            PersistentValue::Scalar(_) => PersistentValue::Map(PersistentMap::new().insert(key, value)),
        }
    }

    /// Return a new value with `value` written at the nested key path,
    /// copying only the containers along that path.
    pub fn set_in(&self, keys: &[String], value: PersistentValue) -> Self {
        let Some((key, rest)) = keys.split_first() else {
            return value;
        };
        let child = self.get(key).cloned().unwrap_or_default();
        self.set(key.clone(), child.set_in(rest, value))
    }
}

impl From<Value> for PersistentValue {
    fn from(value: Value) -> Self {
        PersistentValue::from_json(value)
    }
}

impl From<PersistentValue> for Value {
    fn from(value: PersistentValue) -> Self {
        value.to_json()
    }
}

impl From<PersistentMap> for PersistentValue {
    fn from(map: PersistentMap) -> Self {
        PersistentValue::Map(map)
    }
}

macro_rules! scalar_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for PersistentValue {
                fn from(n: $ty) -> Self {
                    PersistentValue::Scalar(Value::from(n))
                }
            }
        )*
    };
}

scalar_from!(i32, i64, u32, u64, f64);

impl From<bool> for PersistentValue {
    fn from(b: bool) -> Self {
        PersistentValue::Scalar(Value::from(b))
    }
}

impl From<&str> for PersistentValue {
    fn from(s: &str) -> Self {
        PersistentValue::Scalar(Value::from(s))
    }
}

impl From<String> for PersistentValue {
    fn from(s: String) -> Self {
        PersistentValue::Scalar(Value::from(s))
    }
}
