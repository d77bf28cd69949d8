//! Dot-delimited namespace paths.
//!
//! A path names the location a transition is registered under. Its
//! namespace (every segment but the last) names the sub-state the
//! transition operates on.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Segment delimiter used in the string form of a path.
pub const DELIMITER: char = '.';

/// Errors produced while parsing a path string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("Path is empty")]
    Empty,

    #[error("Path '{path}' contains an empty segment")]
    EmptySegment { path: String },
}

/// A parsed namespace path.
///
/// Two paths are equal iff their segment sequences are equal. The
/// zero-segment path is the root namespace and renders as `""`.
///
/// # Example
///
/// ```rust
/// use reducer_builder::core::Path;
///
/// let path = Path::parse("deep.counter.increment").unwrap();
/// assert_eq!(path.namespace().to_string(), "deep.counter");
/// assert_eq!(path.leaf(), Some("increment"));
///
/// let root_level = Path::parse("increment").unwrap();
/// assert!(root_level.namespace().is_root());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// The root namespace.
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Parse a non-empty, dot-delimited path.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::Empty);
        }

        let segments: Vec<String> = raw.split(DELIMITER).map(str::to_owned).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PathError::EmptySegment {
                path: raw.to_owned(),
            });
        }

        Ok(Self { segments })
    }

    /// Parse an optional namespace, treating `None` and `""` as the root.
    pub fn parse_namespace(raw: Option<&str>) -> Result<Self, PathError> {
        match raw {
            None | Some("") => Ok(Self::root()),
            Some(raw) => Self::parse(raw),
        }
    }

    /// Append a (possibly dotted) name to this path.
    pub fn join(&self, name: &str) -> Result<Self, PathError> {
        let tail = Self::parse(name)?;
        let mut segments = self.segments.clone();
        segments.extend(tail.segments);
        Ok(Self { segments })
    }

    /// All segments but the last. Root-level paths yield the root namespace.
    pub fn namespace(&self) -> Self {
        let keep = self.segments.len().saturating_sub(1);
        Self {
            segments: self.segments[..keep].to_vec(),
        }
    }

    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when `self` is a proper segment prefix of `other`.
    ///
    /// `a.b` is a strict prefix of `a.b.c`, but `a.b` is not a prefix of
    /// `a.bc` and no path is a strict prefix of itself.
    pub fn is_strict_prefix_of(&self, other: &Path) -> bool {
        self.segments.len() < other.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                write!(f, "{DELIMITER}")?;
            }
            f.write_str(segment)?;
            first = false;
        }
        Ok(())
    }
}

impl TryFrom<String> for Path {
    type Error = PathError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Path::parse_namespace(Some(&raw))
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.to_string()
    }
}
