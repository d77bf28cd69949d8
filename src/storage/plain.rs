//! Plain nested-record storage over `serde_json::Value`.

use super::{array_index, StorageStrategy};
use crate::core::Path;
use serde_json::{Map, Value};

/// Storage over plain JSON records.
///
/// Reads walk object fields (and array indices, for numeric segments) in
/// path order. Writes take the root by value, assign in place and return it,
/// so no copy of the untouched parts of the tree is made. Arrays follow the
/// indexing rules described in [`crate::storage`].
///
/// # Example
///
/// ```rust
/// use reducer_builder::core::Path;
/// use reducer_builder::storage::{PlainStrategy, StorageStrategy};
/// use serde_json::json;
///
/// let strategy = PlainStrategy;
/// let path = Path::parse("deep.counter").unwrap();
///
/// let state = strategy.set(json!({ "other": true }), &path, json!(2));
/// assert_eq!(state, json!({ "other": true, "deep": { "counter": 2 } }));
/// assert_eq!(strategy.get(&state, &path), Some(json!(2)));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainStrategy;

impl StorageStrategy for PlainStrategy {
    type State = Value;

    fn get(&self, root: &Value, path: &Path) -> Option<Value> {
        path.segments()
            .iter()
            .try_fold(root, |node, segment| child(node, segment))
            .cloned()
    }

    fn set(&self, mut root: Value, path: &Path, value: Value) -> Value {
        if path.is_root() {
            return value;
        }
        assign(&mut root, path.segments(), value);
        root
    }

    fn default_state(&self) -> Value {
        Value::Object(Map::new())
    }
}

fn child<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(fields) => fields.get(segment),
        Value::Array(items) => array_index(segment).and_then(|i| items.get(i)),
        _ => None,
    }
}

fn assign(node: &mut Value, segments: &[String], value: Value) {
    let Some((segment, rest)) = segments.split_first() else {
        *node = value;
        return;
    };

    match node {
        Value::Array(items) => match array_index(segment) {
            Some(index) if index < items.len() => return assign(&mut items[index], rest, value),
            Some(index) if index == items.len() => {
                items.push(Value::Null);
                return assign(&mut items[index], rest, value);
            }
            _ => {
                let fields = std::mem::take(items)
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| (i.to_string(), item))
                    .collect();
                *node = Value::Object(fields);
            }
        },
        Value::Object(_) => {}
        _ if array_index(segment) == Some(0) => *node = Value::Array(Vec::new()),
        _ => *node = Value::Object(Map::new()),
    }

    match node {
        Value::Array(items) => {
            items.push(Value::Null);
            if let Some(slot) = items.last_mut() {
                assign(slot, rest, value);
            }
        }
        Value::Object(fields) => {
            let slot = fields.entry(segment.clone()).or_insert(Value::Null);
            assign(slot, rest, value);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(raw: &str) -> Path {
        Path::parse(raw).unwrap()
    }

    #[test]
    fn get_traverses_nested_records() {
        let state = json!({ "deep": { "counter": 0 } });
        assert_eq!(PlainStrategy.get(&state, &path("deep.counter")), Some(json!(0)));
        assert_eq!(PlainStrategy.get(&state, &path("deep")), Some(json!({ "counter": 0 })));
    }

    #[test]
    fn get_returns_none_for_missing_segments() {
        let state = json!({ "deep": { "counter": 0 } });
        assert_eq!(PlainStrategy.get(&state, &path("deep.missing")), None);
        assert_eq!(PlainStrategy.get(&state, &path("deep.counter.value")), None);
        assert_eq!(PlainStrategy.get(&json!(4), &path("anything")), None);
    }

    #[test]
    fn present_null_is_not_missing() {
        let state = json!({ "slot": null });
        assert_eq!(PlainStrategy.get(&state, &path("slot")), Some(Value::Null));
    }

    #[test]
    fn get_reads_array_indices() {
        let state = json!({ "items": [10, 20] });
        assert_eq!(PlainStrategy.get(&state, &path("items.1")), Some(json!(20)));
        assert_eq!(PlainStrategy.get(&state, &path("items.5")), None);
    }

    #[test]
    fn root_path_reads_and_replaces_whole_state() {
        assert_eq!(PlainStrategy.get(&json!(4), &Path::root()), Some(json!(4)));
        assert_eq!(PlainStrategy.set(json!(4), &Path::root(), json!(5)), json!(5));
    }

    #[test]
    fn set_creates_intermediate_objects() {
        let state = PlainStrategy.set(json!({}), &path("a.b.c"), json!(1));
        assert_eq!(state, json!({ "a": { "b": { "c": 1 } } }));
    }

    #[test]
    fn set_leaves_siblings_untouched() {
        let state = json!({ "count1": 1, "count2": { "x": 2 }, "count3": 3 });
        let state = PlainStrategy.set(state, &path("count2.y"), json!(9));
        assert_eq!(
            state,
            json!({ "count1": 1, "count2": { "x": 2, "y": 9 }, "count3": 3 })
        );
    }

    #[test]
    fn set_replaces_scalar_intermediates() {
        let state = PlainStrategy.set(json!({ "a": 3 }), &path("a.b"), json!(true));
        assert_eq!(state, json!({ "a": { "b": true } }));
    }

    #[test]
    fn set_writes_array_indices() {
        let state = PlainStrategy.set(json!({ "items": [1, 2] }), &path("items.0"), json!(9));
        assert_eq!(state, json!({ "items": [9, 2] }));

        let state = PlainStrategy.set(state, &path("items.2"), json!(3));
        assert_eq!(state, json!({ "items": [9, 2, 3] }));
    }

    #[test]
    fn sparse_index_turns_array_into_object() {
        let state = PlainStrategy.set(json!({ "items": [1] }), &path("items.4000000000"), json!(3));
        assert_eq!(state, json!({ "items": { "0": 1, "4000000000": 3 } }));
        assert_eq!(PlainStrategy.get(&state, &path("items.4000000000")), Some(json!(3)));
    }

    #[test]
    fn out_of_range_index_does_not_overflow() {
        let state = PlainStrategy.set(
            json!({ "items": [] }),
            &path("items.18446744073709551615.count"),
            json!(1),
        );
        assert_eq!(state, json!({ "items": { "18446744073709551615": { "count": 1 } } }));
    }

    #[test]
    fn named_key_keeps_array_elements() {
        let state = PlainStrategy.set(json!({ "items": [1, 2] }), &path("items.total"), json!(3));
        assert_eq!(state, json!({ "items": { "0": 1, "1": 2, "total": 3 } }));
    }

    #[test]
    fn missing_intermediate_before_zero_index_is_array() {
        let state = PlainStrategy.set(json!({}), &path("list.0.name"), json!("a"));
        assert_eq!(state, json!({ "list": [{ "name": "a" }] }));

        let state = PlainStrategy.set(json!({}), &path("list.3"), json!("b"));
        assert_eq!(state, json!({ "list": { "3": "b" } }));
    }

    #[test]
    fn default_state_is_empty_record() {
        assert_eq!(PlainStrategy.default_state(), json!({}));
    }
}
