//! Registration checks using Validation.
//!
//! A batch registration reports every offending entry at once instead of
//! stopping at the first one.

use crate::builder::config::PrefixPolicy;
use crate::builder::error::EntryViolation;
use crate::core::{Path, PathError};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of checking one or more registrations.
pub type RegistrationCheck = Validation<(), NonEmptyVec<EntryViolation>>;

/// Resolve `name` under `namespace` into a full path.
pub(crate) fn resolve_entry(namespace: &Path, name: &str) -> Result<Path, EntryViolation> {
    namespace.join(name).map_err(|err| match err {
        PathError::Empty => EntryViolation::EmptyName,
        PathError::EmptySegment { .. } => EntryViolation::EmptySegment {
            path: join_raw(namespace, name),
        },
    })
}

fn join_raw(namespace: &Path, name: &str) -> String {
    if namespace.is_root() {
        name.to_owned()
    } else {
        format!("{namespace}.{name}")
    }
}

/// Check a single candidate path against already registered paths.
pub(crate) fn check_prefix<'a, I>(policy: PrefixPolicy, candidate: &Path, registered: I) -> RegistrationCheck
where
    I: IntoIterator<Item = &'a Path>,
{
    if policy == PrefixPolicy::Allow {
        return Validation::success(());
    }

    let conflict = registered
        .into_iter()
        .find(|existing| existing.is_strict_prefix_of(candidate) || candidate.is_strict_prefix_of(existing));

    match conflict {
        Some(existing) => Validation::fail(EntryViolation::PrefixConflict {
            path: candidate.to_string(),
            existing: existing.to_string(),
        }),
        None => Validation::success(()),
    }
}

/// Check every pair of paths for prefix overlaps.
///
/// Each overlapping pair is reported once, attributed to the longer path.
pub(crate) fn check_all_prefixes(paths: &[&Path]) -> RegistrationCheck {
    let mut checks: Vec<RegistrationCheck> = Vec::new();

    for candidate in paths {
        for existing in paths {
            if existing.is_strict_prefix_of(candidate) {
                checks.push(Validation::fail(EntryViolation::PrefixConflict {
                    path: candidate.to_string(),
                    existing: existing.to_string(),
                }));
            }
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Collapse an accumulated check into its violations.
pub(crate) fn into_violations(check: RegistrationCheck) -> Vec<EntryViolation> {
    match check {
        Validation::Success(_) => Vec::new(),
        Validation::Failure(errors) => errors.iter().cloned().collect(),
    }
}
