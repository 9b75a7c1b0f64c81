//! Undo journal for a release in progress
//!
//! Every mutation registers its inverse as it succeeds. On failure the journal
//! is replayed newest-first. Once the release commit lands, file-level undo is
//! discarded: the commit is the point of no return and only an unpushed tag
//! can still be removed.

use crate::core::error::ReleaseResult;
use crate::core::vcs::SystemGit;
use std::fs;
use std::path::{Path, PathBuf};

/// Inverse of one mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoAction {
  /// Put a file back to its captured text, or delete it if it did not exist
  RestoreFile { path: PathBuf, original: Option<String> },
  /// Remove paths from the index
  Unstage { paths: Vec<PathBuf> },
  /// Delete an archive written during this run
  RemoveArtifact { path: PathBuf },
  /// Delete a tag created during this run
  DeleteTag { name: String },
}

impl UndoAction {
  /// Whether this undo only makes sense before the release commit exists
  fn is_pre_commit(&self) -> bool {
    !matches!(self, UndoAction::DeleteTag { .. })
  }

  fn apply(&self, git: Option<&SystemGit>) -> ReleaseResult<()> {
    match self {
      UndoAction::RestoreFile { path, original } => match original {
        Some(text) => fs::write(path, text)?,
        None => {
          if path.exists() {
            fs::remove_file(path)?;
          }
        }
      },
      UndoAction::Unstage { paths } => {
        if let Some(git) = git {
          let paths: Vec<&Path> = paths.iter().map(PathBuf::as_path).collect();
          git.unstage(&paths)?;
        }
      }
      UndoAction::RemoveArtifact { path } => {
        if path.exists() {
          fs::remove_file(path)?;
        }
      }
      UndoAction::DeleteTag { name } => {
        if let Some(git) = git {
          git.delete_tag(name)?;
        }
      }
    }
    Ok(())
  }
}

/// Ordered undo list for one release run
#[derive(Debug, Default)]
pub struct Rollback {
  actions: Vec<UndoAction>,
  commit_landed: bool,
}

impl Rollback {
  pub fn new() -> Self {
    Self::default()
  }

  /// Capture a file's current text so it can be restored exactly
  pub fn snapshot(&mut self, path: &Path) -> ReleaseResult<()> {
    let original = if path.exists() {
      Some(fs::read_to_string(path)?)
    } else {
      None
    };
    self.push(UndoAction::RestoreFile {
      path: path.to_path_buf(),
      original,
    });
    Ok(())
  }

  pub fn push(&mut self, action: UndoAction) {
    if self.commit_landed && action.is_pre_commit() {
      tracing::debug!(?action, "ignoring pre-commit undo after commit landed");
      return;
    }
    self.actions.push(action);
  }

  /// The release commit exists: drop every undo that would rewrite its content
  pub fn commit_landed(&mut self) {
    self.commit_landed = true;
    self.actions.retain(|a| !a.is_pre_commit());
  }

  /// Everything succeeded: nothing left to undo
  pub fn disarm(&mut self) {
    self.actions.clear();
  }

  pub fn actions(&self) -> &[UndoAction] {
    &self.actions
  }

  pub fn is_empty(&self) -> bool {
    self.actions.is_empty()
  }

  /// Replay the journal newest-first
  ///
  /// Each step is attempted even if an earlier one failed; failures are
  /// logged and returned so the caller can report them next to the original error.
  pub fn unwind(&mut self, git: Option<&SystemGit>) -> Vec<String> {
    let mut failures = Vec::new();

    while let Some(action) = self.actions.pop() {
      tracing::info!(?action, "rolling back");
      if let Err(err) = action.apply(git) {
        tracing::warn!(?action, error = %err, "rollback step failed");
        failures.push(format!("{:?}: {}", action, err));
      }
    }

    failures
  }
}
