//! Actions dispatched through a composed reducer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Action type dispatched by the reference store when it is created.
///
/// It is never a valid registration path, so composed reducers treat it as
/// an unhandled action and only resolve the default root state.
pub const INIT_ACTION_TYPE: &str = "@@reducer-builder/INIT";

/// An action: the full path of a registered transition plus a payload.
///
/// The wire shape is `{ "type": "<path>", "payload": <any> }`. A missing
/// payload deserializes as `null`.
///
/// # Example
///
/// ```rust
/// use reducer_builder::core::Action;
/// use serde_json::json;
///
/// let action: Action = serde_json::from_value(json!({ "type": "counter.increment" })).unwrap();
/// assert_eq!(action.action_type(), "counter.increment");
/// assert!(action.payload().is_null());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    action_type: String,
    #[serde(default)]
    payload: Value,
}

impl Action {
    /// Create an action without a payload.
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            payload: Value::Null,
        }
    }

    /// Create an action carrying a payload.
    pub fn with_payload(action_type: impl Into<String>, payload: impl Into<Value>) -> Self {
        Self {
            action_type: action_type.into(),
            payload: payload.into(),
        }
    }

    pub fn init() -> Self {
        Self::new(INIT_ACTION_TYPE)
    }

    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Payload as an `i64`, when it is an integer.
    pub fn payload_i64(&self) -> Option<i64> {
        self.payload.as_i64()
    }

    pub fn payload_str(&self) -> Option<&str> {
        self.payload.as_str()
    }
}
