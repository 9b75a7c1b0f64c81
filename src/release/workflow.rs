//! End-to-end release flow
//!
//! ```text
//! load manifest ─► choose build ─┬─► test build ─► done
//!                                └─► clean tree? tag free?
//!                                     ─► snapshot files ─► write versions
//!                                     ─► changelog ─► operator review
//!                                     ─► archives ─► stage + commit   (point of no return)
//!                                     ─► tag ─► push commit ─► push tags
//! ```
//!
//! Any failure before the commit restores every touched file, unstages them
//! and deletes written archives. After the commit only an unpushed tag is
//! removed.

use crate::changelog::generate_changelog;
use crate::core::config::ReleaseConfig;
use crate::core::error::{ReleaseError, ReleaseResult};
use crate::core::npm::Npm;
use crate::core::vcs::SystemGit;
use crate::release::metadata::{MANIFEST_INDENT, MetadataFile, PACKAGE_INDENT};
use crate::release::package::Packager;
use crate::release::rollback::{Rollback, UndoAction};
use crate::release::version::{Bump, ManifestVersion};
use crate::ui::prompt::{BuildChoice, BuildOption, Prompt};
use crate::utils::display_relative;
use std::path::{Path, PathBuf};

/// Text shown at the review gate
pub const CONFIRM_MESSAGE: &str = "Press Enter to package and commit, or Ctrl+C to cancel: ";

/// How a successful run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
  TestBuild { version: String, artifacts: Vec<PathBuf> },
  Released { version: String, artifacts: Vec<PathBuf> },
}

/// The menu offered for `current`
pub fn build_options(current: &ManifestVersion) -> Vec<BuildOption> {
  vec![
    BuildOption {
      choice: BuildChoice::Test,
      label: "Test build (no version bump)".to_string(),
    },
    BuildOption {
      choice: BuildChoice::Release(Bump::Major),
      label: format!("Bump major ({})", current.bump(Bump::Major)),
    },
    BuildOption {
      choice: BuildChoice::Release(Bump::Minor),
      label: format!("Bump minor ({})", current.bump(Bump::Minor)),
    },
  ]
}

/// Read and validate the manifest's current version
pub fn current_version(manifest: &MetadataFile) -> ReleaseResult<ManifestVersion> {
  let version = manifest
    .version()
    .ok_or_else(|| ReleaseError::message("Current manifest version missing"))?;
  ManifestVersion::parse(&version)
}

pub struct ReleaseWorkflow<'a, P: Prompt> {
  config: &'a ReleaseConfig,
  prompt: P,
}

impl<'a, P: Prompt> ReleaseWorkflow<'a, P> {
  pub fn new(config: &'a ReleaseConfig, prompt: P) -> Self {
    Self { config, prompt }
  }

  pub fn prompt(&self) -> &P {
    &self.prompt
  }

  /// Run the interactive flow once
  pub fn run(&mut self) -> ReleaseResult<ReleaseOutcome> {
    let manifest = MetadataFile::load(&self.config.manifest_path())?;
    let current = current_version(&manifest)?;

    match self.prompt.choose_build(&build_options(&current))? {
      BuildChoice::Test => self.test_build(&current),
      BuildChoice::Release(bump) => self.release(manifest, current.bump(bump)),
    }
  }

  fn test_build(&self, current: &ManifestVersion) -> ReleaseResult<ReleaseOutcome> {
    let version = current.to_string();
    let artifacts = Packager::new(self.config).build_all(&version, true, |_| {})?;

    println!("✅ Test build ready: {}", self.describe(&artifacts));
    Ok(ReleaseOutcome::TestBuild { version, artifacts })
  }

  fn release(&mut self, manifest: MetadataFile, target: ManifestVersion) -> ReleaseResult<ReleaseOutcome> {
    let git = SystemGit::open(&self.config.root)?;
    if !git.is_clean()? {
      return Err(ReleaseError::message(
        "Uncommitted changes detected. Please commit or stash them before creating a release build.",
      ));
    }

    let version = target.to_string();
    if git.tag_exists(&version)? {
      return Err(ReleaseError::message(format!("A git tag named {} already exists.", version)));
    }

    let mut rollback = Rollback::new();
    match self.apply(&git, manifest, &version, &mut rollback) {
      Ok(artifacts) => {
        rollback.disarm();
        println!(
          "✅ Release ready: {} (tag {} created and pushed)",
          self.describe(&artifacts),
          version
        );
        Ok(ReleaseOutcome::Released { version, artifacts })
      }
      Err(err) => {
        tracing::warn!(error = %err, "release failed, rolling back");
        for failure in rollback.unwind(Some(&git)) {
          eprintln!("Warning: rollback step failed: {}", failure);
        }
        Err(err)
      }
    }
  }

  /// Every mutating step; each registers its undo before or as it happens
  fn apply(
    &mut self,
    git: &SystemGit,
    mut manifest: MetadataFile,
    version: &str,
    rollback: &mut Rollback,
  ) -> ReleaseResult<Vec<PathBuf>> {
    let config = self.config;
    for path in config.tracked_files() {
      rollback.snapshot(&path)?;
    }

    manifest.set_version(version);
    manifest.save(MANIFEST_INDENT)?;
    self.write_secondary_versions(version)?;
    println!("Updated version to {}", version);
    self.check_interrupt()?;

    generate_changelog(git, &config.manifest_path(), &config.changelog_path())?;
    println!("Changelog regenerated with Features/Fixes/Chore/Other sections.");
    println!(
      "Review and edit {} and {} as needed.",
      display_relative(&config.manifest_path(), &config.root),
      display_relative(&config.changelog_path(), &config.root)
    );
    self.prompt.confirm(CONFIRM_MESSAGE)?;

    let artifacts = Packager::new(config).build_all(version, false, |path| {
      rollback.push(UndoAction::RemoveArtifact {
        path: path.to_path_buf(),
      })
    })?;
    self.check_interrupt()?;

    let staged: Vec<PathBuf> = config.tracked_files().into_iter().filter(|p| p.exists()).collect();
    if staged.is_empty() {
      return Err(ReleaseError::message("Nothing to commit; release aborted."));
    }
    rollback.push(UndoAction::Unstage { paths: staged.clone() });
    let staged_refs: Vec<&Path> = staged.iter().map(PathBuf::as_path).collect();
    git.add(&staged_refs)?;
    if !git.has_staged_changes()? {
      return Err(ReleaseError::message(
        "No staged changes detected; edit the changelog before continuing.",
      ));
    }
    self.check_interrupt()?;

    git.commit(&format!("chore: release v{}", version))?;
    rollback.commit_landed();

    git.create_annotated_tag(version, &format!("Release {}", version))?;
    rollback.push(UndoAction::DeleteTag {
      name: version.to_string(),
    });

    git.push().map_err(|e| {
      ReleaseError::with_help(
        format!("Failed to push release commit: {}", e),
        "Configure an upstream (git push -u origin <branch>) and try again.",
      )
    })?;
    git
      .push_tags()
      .map_err(|e| ReleaseError::message(format!("Release commit pushed, but pushing tags failed: {}", e)))?;

    Ok(artifacts)
  }

  /// Firefox manifest and package.json follow the main manifest when present
  fn write_secondary_versions(&self, version: &str) -> ReleaseResult<()> {
    let firefox = self.config.firefox_manifest_path();
    if firefox.is_file() {
      let mut file = MetadataFile::load(&firefox)?;
      file.set_version(version);
      file.save(MANIFEST_INDENT)?;
    }

    let package_json = self.config.package_json_path();
    if package_json.is_file() {
      let mut file = MetadataFile::load(&package_json)?;
      file.set_version(version);
      file.save(PACKAGE_INDENT)?;

      if self.config.package_lock_path().is_file() {
        Npm::new(&self.config.package_manager, &self.config.root).refresh_lockfile()?;
      }
    }

    Ok(())
  }

  fn check_interrupt(&self) -> ReleaseResult<()> {
    if self.prompt.interrupted() {
      return Err(ReleaseError::cancelled());
    }
    Ok(())
  }

  fn describe(&self, artifacts: &[PathBuf]) -> String {
    artifacts
      .iter()
      .map(|p| display_relative(p, &self.config.root))
      .collect::<Vec<_>>()
      .join(", ")
  }
}
