//! System git backend
//!
//! Every operation shells out to the `git` binary found on PATH. Failures are
//! converted into [`ReleaseError::Command`] carrying git's stderr.

use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Environment variables forwarded to git; everything else is cleared
const PASSTHROUGH_ENV: &[&str] = &[
  "PATH",
  "HOME",
  "USERPROFILE",
  "XDG_CONFIG_HOME",
  "SSH_AUTH_SOCK",
  "GIT_SSH_COMMAND",
  "GIT_ASKPASS",
  "SSH_ASKPASS",
  "GNUPGHOME",
  "GPG_TTY",
  "GPG_AGENT_INFO",
  "LANG",
  "LC_ALL",
];

/// Git backend using system git
pub struct SystemGit {
  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open the repository containing `path`
  ///
  /// Fails unless `path` is inside a git work tree.
  pub fn open(path: &Path) -> ReleaseResult<Self> {
    let candidate = Self {
      work_tree: path.to_path_buf(),
    };

    let inside = candidate
      .run(["rev-parse", "--is-inside-work-tree"])
      .map_err(|_| ReleaseError::message("Not inside a git work tree. Run the release from the repository root."))?;
    if inside != "true" {
      return Err(ReleaseError::message(
        "Not inside a git work tree. Run the release from the repository root.",
      ));
    }

    let top = candidate.run(["rev-parse", "--show-toplevel"])?;
    Ok(Self {
      work_tree: PathBuf::from(top),
    })
  }

  /// Get HEAD commit SHA
  pub fn head_commit(&self) -> ReleaseResult<String> {
    self.rev_parse("HEAD")
  }

  /// Resolve any revision to its object id
  pub fn rev_parse(&self, rev: &str) -> ReleaseResult<String> {
    self.run(["rev-parse", rev])
  }

  /// Resolve a ref to the commit it points at (annotated tags are peeled)
  pub fn commit_of(&self, rev: &str) -> ReleaseResult<String> {
    self.run(["rev-parse", &format!("{}^{{commit}}", rev)])
  }

  /// Run git and return trimmed stdout, or a command error built from stderr
  pub(crate) fn run<I, S>(&self, args: I) -> ReleaseResult<String>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
  {
    let output = self.output(args)?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Run git and return the raw output after checking the exit status
  pub(crate) fn output<I, S>(&self, args: I) -> ReleaseResult<Output>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
  {
    let args: Vec<String> = args
      .into_iter()
      .map(|a| a.as_ref().to_string_lossy().to_string())
      .collect();
    let output = self.raw(&args)?;

    if !output.status.success() {
      return Err(ReleaseError::Command {
        program: "git".to_string(),
        args,
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      });
    }

    Ok(output)
  }

  /// Run git without interpreting the exit status
  pub(crate) fn raw(&self, args: &[String]) -> ReleaseResult<Output> {
    tracing::debug!(cwd = %self.work_tree.display(), "git {}", args.join(" "));
    self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute git {}", args.join(" ")))
  }

  /// Create a git command with an isolated environment
  ///
  /// - Runs against the work tree
  /// - Clears environment variables except the passthrough list
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.work_tree);

    cmd.env_clear();
    for key in PASSTHROUGH_ENV {
      if let Ok(value) = std::env::var(key) {
        cmd.env(key, value);
      }
    }

    cmd.arg("-c").arg("core.quotePath=false");
    cmd.arg("-c").arg("advice.detachedHead=false");

    cmd
  }
}
