//! Trees of bound action dispatchers.
//!
//! An [`ActionTree`] mirrors the registered paths: every path segment is a
//! node, and every registered path ends in a node carrying a
//! [`BoundAction`]. Invoking a bound action builds `{ type, payload }` and
//! hands it to the dispatch sink the tree was built with.
//!
//! When both `a.b` and `a.b.c` are registered, node `a.b` is callable and
//! also has the child `c`.
//!
//! Nodes live in a flat arena; node `0` is the root.

use crate::core::{Action, Path};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::trace;

/// Destination for actions produced by bound dispatchers.
pub type DispatchSink = Arc<dyn Fn(Action) + Send + Sync>;

/// Errors from dispatching through an action tree by path.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionTreeError {
    #[error("No action tree node at '{0}'")]
    UnknownPath(String),

    #[error("Action tree node '{0}' has children but no bound action")]
    NotCallable(String),
}

/// A dispatcher bound to one action type.
#[derive(Clone)]
pub struct BoundAction {
    action_type: String,
    sink: DispatchSink,
}

impl BoundAction {
    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    /// Dispatch `{ type, payload }`.
    pub fn dispatch(&self, payload: impl Into<Value>) {
        self.send(Action::with_payload(self.action_type.clone(), payload))
    }

    /// Dispatch with no payload.
    pub fn dispatch_empty(&self) {
        self.send(Action::new(self.action_type.clone()))
    }

    fn send(&self, action: Action) {
        trace!(action_type = %self.action_type, "dispatching bound action");
        (self.sink)(action)
    }
}

impl fmt::Debug for BoundAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundAction")
            .field("action_type", &self.action_type)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
struct ActionNode {
    path: String,
    action: Option<BoundAction>,
    children: Vec<(String, usize)>,
}

/// Nested dispatchers keyed by path segment.
///
/// # Example
///
/// ```rust
/// use reducer_builder::builder::{ReducerBuilder, ReducerSet};
/// use reducer_builder::core::Action;
/// use reducer_builder::storage::PlainStrategy;
/// use serde_json::{json, Value};
/// use std::sync::{Arc, Mutex};
///
/// let builder = ReducerBuilder::new(PlainStrategy)
///     .register_object(&ReducerSet::new().on("increment", |s: Value, _| s), Some("count1"), None)?
///     .register_object(&ReducerSet::new().on("decrement", |s: Value, _| s), Some("count2"), None)?;
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let log = Arc::clone(&seen);
/// let tree = builder.build_action_tree(move |action: Action| log.lock().unwrap().push(action));
///
/// assert_eq!(tree.root().keys().collect::<Vec<_>>(), vec!["count1", "count2"]);
/// tree.root().child("count1").unwrap().child("increment").unwrap().dispatch(2)?;
///
/// assert_eq!(*seen.lock().unwrap(), vec![Action::with_payload("count1.increment", 2)]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct ActionTree {
    nodes: Vec<ActionNode>,
    action_count: usize,
}

impl ActionTree {
    /// Build a tree with one bound action per path, in iteration order.
    pub fn build<'a, I>(paths: I, sink: DispatchSink) -> Self
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut tree = ActionTree {
            nodes: vec![ActionNode::default()],
            action_count: 0,
        };

        for path in paths {
            let index = tree.ensure_path(path);
            let node = &mut tree.nodes[index];
            if node.action.is_none() {
                tree.action_count += 1;
            }
            node.action = Some(BoundAction {
                action_type: path.to_string(),
                sink: Arc::clone(&sink),
            });
        }

        tree
    }

    /// Walk `path` from the root, creating missing nodes. Returns the index
    /// of the final node.
    fn ensure_path(&mut self, path: &Path) -> usize {
        let mut current = 0;
        for segment in path.segments() {
            current = match self.child_index(current, segment) {
                Some(index) => index,
                None => {
                    let index = self.nodes.len();
                    let parent = &self.nodes[current].path;
                    let path = if parent.is_empty() {
                        segment.clone()
                    } else {
                        format!("{parent}.{segment}")
                    };
                    self.nodes.push(ActionNode {
                        path,
                        ..ActionNode::default()
                    });
                    self.nodes[current].children.push((segment.clone(), index));
                    index
                }
            };
        }
        current
    }

    fn child_index(&self, parent: usize, segment: &str) -> Option<usize> {
        self.nodes[parent]
            .children
            .iter()
            .find(|(name, _)| name == segment)
            .map(|(_, index)| *index)
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef { tree: self, index: 0 }
    }

    /// Node at a dot-delimited path. `""` is the root.
    pub fn get(&self, path: &str) -> Option<NodeRef<'_>> {
        let path = Path::parse_namespace(Some(path)).ok()?;
        path.segments()
            .iter()
            .try_fold(self.root(), |node, segment| node.child(segment))
    }

    /// Bound action registered at exactly `path`.
    pub fn action(&self, path: &str) -> Option<&BoundAction> {
        self.get(path).and_then(|node| node.action())
    }

    /// Dispatch through the node at `path`.
    pub fn dispatch(&self, path: &str, payload: impl Into<Value>) -> Result<(), ActionTreeError> {
        self.get(path)
            .ok_or_else(|| ActionTreeError::UnknownPath(path.to_owned()))?
            .dispatch(payload)
    }

    /// Number of bound actions in the tree.
    pub fn action_count(&self) -> usize {
        self.action_count
    }

    pub fn is_empty(&self) -> bool {
        self.action_count == 0
    }
}

/// A borrowed view of one node in an [`ActionTree`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a ActionTree,
    index: usize,
}

impl<'a> NodeRef<'a> {
    fn node(&self) -> &'a ActionNode {
        &self.tree.nodes[self.index]
    }

    pub fn child(&self, segment: &str) -> Option<NodeRef<'a>> {
        self.tree
            .child_index(self.index, segment)
            .map(|index| NodeRef { tree: self.tree, index })
    }

    /// Child segment names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> {
        self.node().children.iter().map(|(name, _)| name.as_str())
    }

    pub fn action(&self) -> Option<&'a BoundAction> {
        self.node().action.as_ref()
    }

    pub fn is_callable(&self) -> bool {
        self.node().action.is_some()
    }

    pub fn has_children(&self) -> bool {
        !self.node().children.is_empty()
    }

    /// Invoke this node's bound action.
    pub fn dispatch(&self, payload: impl Into<Value>) -> Result<(), ActionTreeError> {
        let action = self.action().ok_or_else(|| self.not_callable())?;
        action.dispatch(payload);
        Ok(())
    }

    pub fn dispatch_empty(&self) -> Result<(), ActionTreeError> {
        let action = self.action().ok_or_else(|| self.not_callable())?;
        action.dispatch_empty();
        Ok(())
    }

    /// Dot-delimited path of this node. The root is `""`.
    pub fn path(&self) -> &'a str {
        &self.node().path
    }

    fn not_callable(&self) -> ActionTreeError {
        ActionTreeError::NotCallable(self.path().to_owned())
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("path", &self.path())
            .field("action", &self.action().map(BoundAction::action_type))
            .field("children", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}
