//! Registration errors for the reducer builder.

use thiserror::Error;

/// A single problem found while validating a registration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntryViolation {
    #[error("Transition name is empty")]
    EmptyName,

    #[error("Path '{path}' contains an empty segment")]
    EmptySegment { path: String },

    #[error("Path '{path}' overlaps registered path '{existing}'")]
    PrefixConflict { path: String, existing: String },
}

/// Errors that can occur when registering transitions.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Cannot register a transition without a namespace. Pass a non-empty path")]
    InvalidNamespace,

    #[error("Registration rejected with {} violation(s): {}", .violations.len(), describe(.violations))]
    Rejected { violations: Vec<EntryViolation> },
}

impl RegistryError {
    /// Violations carried by a rejected registration, empty otherwise.
    pub fn violations(&self) -> &[EntryViolation] {
        match self {
            RegistryError::Rejected { violations } => violations,
            RegistryError::InvalidNamespace => &[],
        }
    }
}

fn describe(violations: &[EntryViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
