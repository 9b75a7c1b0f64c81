//! Release-facing operations for SystemGit (status, staging, tags, history)

use super::Commit;
use super::system_git::SystemGit;
use crate::core::error::{ReleaseError, ReleaseResult};
use crate::utils::path_to_git_format;
use chrono::NaiveDate;
use std::path::Path;

/// Field separator inside the custom `git log` pretty format
const FIELD_SEP: char = '\x1f';

impl SystemGit {
  /// True when `git status --porcelain` reports nothing
  pub fn is_clean(&self) -> ReleaseResult<bool> {
    Ok(self.run(["status", "--porcelain"])?.is_empty())
  }

  /// Stage the given paths
  pub fn add(&self, paths: &[&Path]) -> ReleaseResult<()> {
    let mut args = vec!["add".to_string(), "--".to_string()];
    args.extend(paths.iter().map(|p| self.git_path(p)));
    self.run(&args)?;
    Ok(())
  }

  /// Unstage the given paths (`git reset HEAD -- <paths>`)
  pub fn unstage(&self, paths: &[&Path]) -> ReleaseResult<()> {
    let mut args = vec!["reset".to_string(), "-q".to_string(), "HEAD".to_string(), "--".to_string()];
    args.extend(paths.iter().map(|p| self.git_path(p)));
    self.run(&args)?;
    Ok(())
  }

  /// Whether the index differs from HEAD
  ///
  /// `git diff --cached --quiet` exits 0 for no changes and 1 for changes;
  /// any other status is a failure.
  pub fn has_staged_changes(&self) -> ReleaseResult<bool> {
    let args = vec!["diff".to_string(), "--cached".to_string(), "--quiet".to_string()];
    let output = self.raw(&args)?;

    match output.status.code() {
      Some(0) => Ok(false),
      Some(1) => Ok(true),
      _ => Err(ReleaseError::message("Unable to verify staged changes.")),
    }
  }

  /// Commit the index with a one-line message
  pub fn commit(&self, message: &str) -> ReleaseResult<()> {
    self.run(["commit", "-m", message])?;
    Ok(())
  }

  /// Check whether a tag with exactly this name exists
  pub fn tag_exists(&self, name: &str) -> ReleaseResult<bool> {
    let listed = self.run(["tag", "-l", name])?;
    Ok(listed.lines().any(|line| line.trim() == name))
  }

  /// Create an annotated tag on HEAD
  pub fn create_annotated_tag(&self, name: &str, message: &str) -> ReleaseResult<()> {
    self.run(["tag", "-a", name, "-m", message])?;
    Ok(())
  }

  pub fn delete_tag(&self, name: &str) -> ReleaseResult<()> {
    self.run(["tag", "-d", name])?;
    Ok(())
  }

  /// Push the current branch to its upstream
  pub fn push(&self) -> ReleaseResult<()> {
    self.run(["push"])?;
    Ok(())
  }

  /// Push tags to the default remote
  pub fn push_tags(&self) -> ReleaseResult<()> {
    self.run(["push", "--tags"])?;
    Ok(())
  }

  /// All tags, oldest first by creation date
  pub fn tags_by_creation(&self) -> ReleaseResult<Vec<String>> {
    let output = self.run(["tag", "--sort=creatordate"])?;
    Ok(
      output
        .lines()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect(),
    )
  }

  /// Non-merge commits in `range`, newest first by commit date
  pub fn log_commits(&self, range: &str) -> ReleaseResult<Vec<Commit>> {
    let format = format!("--pretty=format:%h{sep}%cs{sep}%s", sep = FIELD_SEP);
    let output = self.run(["log", range, &format, "--date-order", "--no-merges"])?;

    output.lines().filter(|l| !l.is_empty()).map(parse_commit_line).collect()
  }

  /// Committer date of the commit `rev` points at
  pub fn ref_date(&self, rev: &str) -> ReleaseResult<NaiveDate> {
    let raw = self.run(["log", "-1", rev, "--pretty=format:%cs"])?;
    parse_date(&raw)
  }

  /// Path relative to the work tree, in git's separator format
  fn git_path(&self, path: &Path) -> String {
    let relative = path.strip_prefix(&self.work_tree).unwrap_or(path);
    path_to_git_format(relative)
  }
}

/// Parse one `%h<US>%cs<US>%s` line
pub(crate) fn parse_commit_line(line: &str) -> ReleaseResult<Commit> {
  let mut fields = line.splitn(3, FIELD_SEP);
  let (Some(sha), Some(date), Some(summary)) = (fields.next(), fields.next(), fields.next()) else {
    return Err(ReleaseError::message(format!("Malformed git log line: {:?}", line)));
  };

  Ok(Commit {
    sha: sha.to_string(),
    date: parse_date(date)?,
    summary: summary.to_string(),
  })
}

fn parse_date(raw: &str) -> ReleaseResult<NaiveDate> {
  Ok(NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")?)
}
