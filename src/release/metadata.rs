//! JSON metadata files that carry the extension version
//!
//! Manifests are rewritten with 4-space indentation, package.json with
//! 2-space indentation; both end with a newline. Key order is preserved.

use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Indentation used by browser extension manifests
pub const MANIFEST_INDENT: usize = 4;
/// Indentation used by package.json
pub const PACKAGE_INDENT: usize = 2;

/// A JSON object file with a `version` field
#[derive(Debug, Clone)]
pub struct MetadataFile {
  path: PathBuf,
  fields: Map<String, Value>,
}

impl MetadataFile {
  /// Load and parse a metadata file; the top level must be a JSON object
  pub fn load(path: &Path) -> ReleaseResult<Self> {
    let name = file_name(path);
    if !path.exists() {
      return Err(ReleaseError::message(format!("{} not found at {}", name, path.display())));
    }

    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Self::parse(path, &text)
  }

  pub fn parse(path: &Path, text: &str) -> ReleaseResult<Self> {
    let name = file_name(path);
    let value: Value = serde_json::from_str(text)
      .map_err(|e| ReleaseError::message(format!("Unable to parse {}: {}", name, e)))?;

    match value {
      Value::Object(fields) => Ok(Self {
        path: path.to_path_buf(),
        fields,
      }),
      _ => Err(ReleaseError::message(format!("{} must contain a JSON object", name))),
    }
  }

  /// The `version` field as text; absent, null or empty counts as missing
  pub fn version(&self) -> Option<String> {
    match self.fields.get("version")? {
      Value::Null => None,
      Value::String(s) if s.is_empty() => None,
      Value::String(s) => Some(s.clone()),
      other => Some(other.to_string()),
    }
  }

  pub fn set_version(&mut self, version: &str) {
    self.fields.insert("version".to_string(), Value::String(version.to_string()));
  }

  /// Serialize with `indent` spaces per level and a trailing newline
  pub fn to_pretty_string(&self, indent: usize) -> ReleaseResult<String> {
    let indent = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    self.fields.serialize(&mut serializer)?;

    let mut text = String::from_utf8(buf).map_err(|e| ReleaseError::message(format!("UTF-8 error: {}", e)))?;
    text.push('\n');
    Ok(text)
  }

  pub fn save(&self, indent: usize) -> ReleaseResult<()> {
    let text = self.to_pretty_string(indent)?;
    fs::write(&self.path, text).with_context(|| format!("Failed to write {}", self.path.display()))?;
    Ok(())
  }
}

fn file_name(path: &Path) -> String {
  path
    .file_name()
    .map(|n| n.to_string_lossy().to_string())
    .unwrap_or_else(|| path.display().to_string())
}
