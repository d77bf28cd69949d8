//! Dispatch history tracking.
//!
//! Keeps the most recent actions a store has seen, in the order they were
//! applied.

use crate::core::Action;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Record of a single dispatched action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DispatchRecord {
    /// The dispatched action
    pub action: Action,
    /// When the action was dispatched
    pub timestamp: DateTime<Utc>,
    /// Whether a registered transition handled the action
    pub handled: bool,
}

/// Ordered history of dispatched actions.
///
/// An optional limit keeps only the most recent records; pushing past it
/// drops the oldest one.
///
/// # Example
///
/// ```rust
/// use reducer_builder::core::Action;
/// use reducer_builder::store::{DispatchHistory, DispatchRecord};
/// use chrono::Utc;
///
/// let mut history = DispatchHistory::with_limit(2);
/// for action_type in ["counter.increment", "counter.decrement", "counter.reset"] {
///     history.push(DispatchRecord {
///         action: Action::new(action_type),
///         timestamp: Utc::now(),
///         handled: true,
///     });
/// }
///
/// assert_eq!(history.action_types(), vec!["counter.decrement", "counter.reset"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchHistory {
    records: VecDeque<DispatchRecord>,
    limit: Option<usize>,
}

impl DispatchHistory {
    /// Create an empty history with no limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty history that keeps at most `limit` records.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: VecDeque::new(),
            limit: Some(limit),
        }
    }

    /// Append a record, dropping the oldest ones beyond the limit.
    pub fn push(&mut self, record: DispatchRecord) {
        self.records.push_back(record);
        if let Some(limit) = self.limit {
            while self.records.len() > limit {
                self.records.pop_front();
            }
        }
    }

    /// Action types in dispatch order.
    pub fn action_types(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|record| record.action.action_type())
            .collect()
    }

    /// Records whose action no transition handled.
    pub fn unhandled(&self) -> impl Iterator<Item = &DispatchRecord> {
        self.records.iter().filter(|record| !record.handled)
    }

    /// Records in dispatch order.
    pub fn records(&self) -> impl Iterator<Item = &DispatchRecord> {
        self.records.iter()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
