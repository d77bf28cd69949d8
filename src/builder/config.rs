//! Registry configuration.

use serde::{Deserialize, Serialize};

/// How the registry treats a path that is a strict prefix of another
/// registered path (for example `a.b` next to `a.b.c`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixPolicy {
    /// Accept both. The action tree gets a node that is callable and also
    /// has children.
    #[default]
    Allow,

    /// Reject the later registration with a prefix-conflict violation.
    Reject,
}

/// Settings for a [`ReducerBuilder`](crate::builder::ReducerBuilder).
///
/// # Example
///
/// ```rust
/// use reducer_builder::builder::{PrefixPolicy, RegistryConfig};
///
/// let config: RegistryConfig = serde_json::from_str(r#"{ "prefix_policy": "reject" }"#).unwrap();
/// assert_eq!(config.prefix_policy, PrefixPolicy::Reject);
/// assert!(!config.warn_on_overwrite);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub prefix_policy: PrefixPolicy,

    /// Log a warning when a path is registered a second time. The later
    /// transition replaces the earlier one either way.
    pub warn_on_overwrite: bool,
}

impl RegistryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prefix policy
    pub fn prefix_policy(mut self, policy: PrefixPolicy) -> Self {
        self.prefix_policy = policy;
        self
    }

    pub fn warn_on_overwrite(mut self, warn: bool) -> Self {
        self.warn_on_overwrite = warn;
        self
    }
}
