//! Zip packaging of the extension sources
//!
//! The package entry list is resolved to concrete files before any archive is
//! opened, so a missing entry never leaves a partial archive in `dist/`.

use crate::core::config::ReleaseConfig;
use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use crate::utils::path_to_git_format;
use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// Suffix marking throwaway test builds
pub const TEST_SUFFIX: &str = "test";
/// Suffix marking the Firefox build
pub const FIREFOX_SUFFIX: &str = "firefox";

/// Browser flavour an archive targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
  /// Default build using the canonical manifest
  Chromium,
  /// Build whose manifest.json carries the secondary Firefox manifest
  Firefox,
}

/// Deterministic archive file name: `<product>-<version>[-firefox][-test].zip`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName<'a> {
  pub product: &'a str,
  pub version: &'a str,
  pub variant: Variant,
  pub test: bool,
}

impl fmt::Display for ArtifactName<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}", self.product, self.version)?;
    if self.variant == Variant::Firefox {
      write!(f, "-{}", FIREFOX_SUFFIX)?;
    }
    if self.test {
      write!(f, "-{}", TEST_SUFFIX)?;
    }
    f.write_str(".zip")
  }
}

/// A file scheduled for packing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageFile {
  pub source: PathBuf,
  /// Forward-slash path inside the archive, relative to the repo root
  pub archive_name: String,
}

/// Resolve package entries to files, directories expanded recursively in sorted order
pub fn resolve_entries(root: &Path, entries: &[String]) -> ReleaseResult<Vec<PackageFile>> {
  let mut files = Vec::new();

  for entry in entries {
    let path = root.join(entry);
    if path.is_dir() {
      let mut found = Vec::new();
      collect_files(&path, &mut found)?;
      found.sort();
      for source in found {
        files.push(package_file(root, source)?);
      }
    } else if path.is_file() {
      files.push(package_file(root, path)?);
    } else {
      return Err(ReleaseError::message(format!("Package entry missing: {}", entry)));
    }
  }

  Ok(files)
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> ReleaseResult<()> {
  for entry in fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))? {
    let path = entry?.path();
    if path.is_dir() {
      collect_files(&path, out)?;
    } else if path.is_file() {
      out.push(path);
    }
  }
  Ok(())
}

fn package_file(root: &Path, source: PathBuf) -> ReleaseResult<PackageFile> {
  let archive_name = path_to_git_format(source.strip_prefix(root)?);
  Ok(PackageFile { source, archive_name })
}

/// Builds archives for one configuration
pub struct Packager<'a> {
  config: &'a ReleaseConfig,
}

impl<'a> Packager<'a> {
  pub fn new(config: &'a ReleaseConfig) -> Self {
    Self { config }
  }

  /// Variants to build: always Chromium, plus Firefox when its manifest exists
  pub fn variants(&self) -> Vec<Variant> {
    let mut variants = vec![Variant::Chromium];
    if self.config.firefox_manifest_path().is_file() {
      variants.push(Variant::Firefox);
    }
    variants
  }

  /// Resolve the configured entry list
  pub fn resolve(&self) -> ReleaseResult<Vec<PackageFile>> {
    resolve_entries(&self.config.root, &self.config.entries)
  }

  /// Where an archive for `version` / `variant` lands
  pub fn artifact_path(&self, version: &str, variant: Variant, test: bool) -> PathBuf {
    let name = ArtifactName {
      product: &self.config.product,
      version,
      variant,
      test,
    };
    self.config.dist_path().join(name.to_string())
  }

  /// Write one archive from already-resolved files
  ///
  /// A failed write removes the partial archive before returning the error.
  pub fn write_archive(
    &self,
    version: &str,
    variant: Variant,
    test: bool,
    files: &[PackageFile],
  ) -> ReleaseResult<PathBuf> {
    let dist = self.config.dist_path();
    fs::create_dir_all(&dist).with_context(|| format!("Failed to create {}", dist.display()))?;

    let path = self.artifact_path(version, variant, test);
    let manifest_override = match variant {
      Variant::Chromium => None,
      Variant::Firefox => Some((
        path_to_git_format(&self.config.manifest),
        self.config.firefox_manifest_path(),
      )),
    };

    if let Err(err) = write_zip(&path, files, manifest_override.as_ref()) {
      let _ = fs::remove_file(&path);
      return Err(err.context(format!("Failed to build {}", path.display())));
    }

    tracing::info!(path = %path.display(), files = files.len(), "archive written");
    Ok(path)
  }

  /// Resolve entries once and write every variant, reporting each path as it lands
  pub fn build_all<F>(&self, version: &str, test: bool, mut on_written: F) -> ReleaseResult<Vec<PathBuf>>
  where
    F: FnMut(&Path),
  {
    let files = self.resolve()?;
    let mut written = Vec::new();
    for variant in self.variants() {
      let path = self.write_archive(version, variant, test, &files)?;
      on_written(&path);
      written.push(path);
    }
    Ok(written)
  }
}

fn write_zip(path: &Path, files: &[PackageFile], manifest_override: Option<&(String, PathBuf)>) -> ReleaseResult<()> {
  let file = File::create(path)?;
  let mut zip = zip::ZipWriter::new(file);
  let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

  for entry in files {
    let source = match manifest_override {
      Some((name, replacement)) if *name == entry.archive_name => replacement.as_path(),
      _ => entry.source.as_path(),
    };
    let bytes = fs::read(source).with_context(|| format!("Failed to read {}", source.display()))?;
    zip.start_file(entry.archive_name.as_str(), options)?;
    zip.write_all(&bytes)?;
  }

  zip.finish()?;
  Ok(())
}
