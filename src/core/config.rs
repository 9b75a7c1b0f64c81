use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Release configuration, passed explicitly into every operation.
///
/// Defaults describe the extension repository layout. Any field can be
/// overridden from a config file searched in order: release.toml,
/// .release.toml, .config/release.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseConfig {
  /// Repository root; every relative path below resolves against it
  #[serde(skip)]
  pub root: PathBuf,

  /// Archive name prefix (`<product>-<version>.zip`)
  #[serde(default = "default_product")]
  pub product: String,

  /// Canonical extension manifest; its `version` drives the release
  #[serde(default = "default_manifest")]
  pub manifest: PathBuf,

  /// Secondary platform manifest, only touched when present
  #[serde(default = "default_firefox_manifest")]
  pub firefox_manifest: PathBuf,

  #[serde(default = "default_changelog")]
  pub changelog: PathBuf,

  /// Package metadata (package.json), only touched when present
  #[serde(default = "default_package_json")]
  pub package_json: PathBuf,

  /// Lockfile refreshed through the package manager when it and package.json exist
  #[serde(default = "default_package_lock")]
  pub package_lock: PathBuf,

  #[serde(default = "default_dist_dir")]
  pub dist_dir: PathBuf,

  /// Files and directories packed into every archive, in order
  #[serde(default = "default_entries")]
  pub entries: Vec<String>,

  /// Program used to regenerate the lockfile
  #[serde(default = "default_package_manager")]
  pub package_manager: String,
}

fn default_product() -> String {
  "shift-code-manager".to_string()
}

fn default_manifest() -> PathBuf {
  PathBuf::from("manifest.json")
}

fn default_firefox_manifest() -> PathBuf {
  PathBuf::from("manifest.firefox.json")
}

fn default_changelog() -> PathBuf {
  PathBuf::from("CHANGELOG.md")
}

fn default_package_json() -> PathBuf {
  PathBuf::from("package.json")
}

fn default_package_lock() -> PathBuf {
  PathBuf::from("package-lock.json")
}

fn default_dist_dir() -> PathBuf {
  PathBuf::from("dist")
}

fn default_entries() -> Vec<String> {
  [
    "manifest.json",
    "popup.html",
    "help.html",
    "popup.js",
    "background.js",
    "shift-handler.js",
    "assets",
    "LICENSE",
    "PRIVACY.md",
    "CHANGELOG.md",
  ]
  .iter()
  .map(|s| s.to_string())
  .collect()
}

fn default_package_manager() -> String {
  "npm".to_string()
}

impl ReleaseConfig {
  /// Default configuration rooted at `root`
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      product: default_product(),
      manifest: default_manifest(),
      firefox_manifest: default_firefox_manifest(),
      changelog: default_changelog(),
      package_json: default_package_json(),
      package_lock: default_package_lock(),
      dist_dir: default_dist_dir(),
      entries: default_entries(),
      package_manager: default_package_manager(),
    }
  }

  pub fn find_config_path(root: &Path) -> Option<PathBuf> {
    let candidates = vec![
      root.join("release.toml"),
      root.join(".release.toml"),
      root.join(".config").join("release.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load configuration for `root`, falling back to defaults when no config file exists
  pub fn load(root: &Path) -> ReleaseResult<Self> {
    let Some(config_path) = Self::find_config_path(root) else {
      tracing::debug!(root = %root.display(), "no release config file, using defaults");
      return Ok(Self::new(root));
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let mut config = Self::parse(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;
    config.root = root.to_path_buf();

    tracing::debug!(path = %config_path.display(), "loaded release config");
    Ok(config)
  }

  /// Parse and validate a config document (root left empty)
  pub fn parse(content: &str) -> ReleaseResult<Self> {
    let config: ReleaseConfig = toml_edit::de::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> ReleaseResult<()> {
    if self.product.trim().is_empty() {
      return Err(ReleaseError::message("Config field 'product' must not be empty"));
    }
    if self.package_manager.trim().is_empty() {
      return Err(ReleaseError::message("Config field 'package_manager' must not be empty"));
    }
    if self.entries.is_empty() {
      return Err(ReleaseError::message("Config field 'entries' must list at least one path"));
    }
    for entry in &self.entries {
      if !is_contained(Path::new(entry)) {
        return Err(ReleaseError::message(format!(
          "Package entry '{}' must be a relative path inside the repository",
          entry
        )));
      }
    }
    Ok(())
  }

  /// Absolute path for a repository-relative path
  pub fn path(&self, relative: &Path) -> PathBuf {
    self.root.join(relative)
  }

  pub fn manifest_path(&self) -> PathBuf {
    self.path(&self.manifest)
  }

  pub fn firefox_manifest_path(&self) -> PathBuf {
    self.path(&self.firefox_manifest)
  }

  pub fn changelog_path(&self) -> PathBuf {
    self.path(&self.changelog)
  }

  pub fn package_json_path(&self) -> PathBuf {
    self.path(&self.package_json)
  }

  pub fn package_lock_path(&self) -> PathBuf {
    self.path(&self.package_lock)
  }

  pub fn dist_path(&self) -> PathBuf {
    self.path(&self.dist_dir)
  }

  /// Every file a release may rewrite, in snapshot order
  pub fn tracked_files(&self) -> Vec<PathBuf> {
    vec![
      self.manifest_path(),
      self.firefox_manifest_path(),
      self.changelog_path(),
      self.package_json_path(),
      self.package_lock_path(),
    ]
  }
}

fn is_contained(path: &Path) -> bool {
  !path.as_os_str().is_empty() && path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
