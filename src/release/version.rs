//! Dotted numeric extension versions (`1.4`, `1.4.0`, `2.0.1.3`)

use crate::core::error::{ReleaseError, ReleaseResult};
use std::fmt;
use std::str::FromStr;

/// Version bump selected by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bump {
  /// Increment the first segment, reset every later segment to zero
  Major,
  /// Increment the second segment, keep everything else
  Minor,
}

impl Bump {
  pub fn as_str(&self) -> &'static str {
    match self {
      Bump::Major => "major",
      Bump::Minor => "minor",
    }
  }
}

impl fmt::Display for Bump {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A validated manifest version: one or more dot-separated digit runs
///
/// Segments keep their text as written, so `1.04` prints back as `1.04` and
/// segments of any length are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestVersion {
  segments: Vec<String>,
}

impl ManifestVersion {
  /// Validate and parse a version string
  ///
  /// Rejects the empty string and any segment that is not made only of ASCII
  /// digits (so `1..2`, `1.x` and `-1` all fail).
  pub fn parse(version: &str) -> ReleaseResult<Self> {
    if version.is_empty() {
      return Err(ReleaseError::message("Version string is empty"));
    }

    let segments = version
      .split('.')
      .map(|part| {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
          return Err(ReleaseError::message(
            "Version must contain only numeric segments separated by dots",
          ));
        }
        Ok(part.to_string())
      })
      .collect::<ReleaseResult<Vec<_>>>()?;

    Ok(Self { segments })
  }

  pub fn segments(&self) -> &[String] {
    &self.segments
  }

  /// Apply a bump, returning the new version
  ///
  /// A single-segment version gains a zero second segment first. Segments of
  /// the result are written without leading zeros.
  pub fn bump(&self, bump: Bump) -> Self {
    let mut segments: Vec<String> = self.segments.iter().map(|s| strip_leading_zeros(s)).collect();
    if segments.len() < 2 {
      segments.push("0".to_string());
    }

    match bump {
      Bump::Major => {
        segments[0] = increment(&segments[0]);
        for segment in segments.iter_mut().skip(1) {
          *segment = "0".to_string();
        }
      }
      Bump::Minor => segments[1] = increment(&segments[1]),
    }

    Self { segments }
  }
}

fn strip_leading_zeros(digits: &str) -> String {
  match digits.trim_start_matches('0') {
    "" => "0".to_string(),
    rest => rest.to_string(),
  }
}

/// Add one to a decimal digit string of any length
fn increment(digits: &str) -> String {
  let mut out: Vec<u8> = digits.bytes().collect();
  let mut carry = true;
  for digit in out.iter_mut().rev() {
    if *digit == b'9' {
      *digit = b'0';
    } else {
      *digit += 1;
      carry = false;
      break;
    }
  }
  if carry {
    out.insert(0, b'1');
  }
  out.into_iter().map(char::from).collect()
}

impl FromStr for ManifestVersion {
  type Err = ReleaseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl fmt::Display for ManifestVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.segments.join("."))
  }
}
