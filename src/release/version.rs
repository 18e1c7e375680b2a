//! Target version validation
//!
//! Only plain `MAJOR.MINOR.PATCH` is accepted as a target. Pre-release and
//! build suffixes that `semver` would parse are rejected: the tag name and the
//! uploaded filename must agree, and registries normalise suffixes.

use crate::core::error::{ReleaseError, ReleaseResult, ValidationError};
use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

// ASCII digits only; `\d` in the regex crate is Unicode-aware
static VERSION_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("static regex"));

/// Does `input` look like `MAJOR.MINOR.PATCH`?
pub fn is_valid_version(input: &str) -> bool {
  VERSION_PATTERN.is_match(input)
}

/// Validate a target version before anything is mutated
pub fn validate_version(input: &str) -> ReleaseResult<()> {
  if is_valid_version(input) {
    Ok(())
  } else {
    Err(ReleaseError::Validation(ValidationError::Version {
      input: input.to_string(),
    }))
  }
}

/// Compare a target against the current version, when both are semver
///
/// Returns `None` if either side does not parse (leading zeros, a hand-edited
/// manifest with a suffix, ...). Used for an advisory warning only.
pub fn compare_versions(target: &str, current: &str) -> Option<Ordering> {
  let target = semver::Version::parse(target).ok()?;
  let current = semver::Version::parse(current).ok()?;
  Some(target.cmp(&current))
}
