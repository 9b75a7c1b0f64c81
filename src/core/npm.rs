//! Package-manager invocation (lockfile refresh only)

use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use std::path::{Path, PathBuf};
use std::process::Command;

pub struct Npm {
  program: String,
  work_dir: PathBuf,
}

impl Npm {
  pub fn new(program: impl Into<String>, work_dir: &Path) -> Self {
    Self {
      program: program.into(),
      work_dir: work_dir.to_path_buf(),
    }
  }

  /// Regenerate the lockfile from package.json without touching node_modules
  pub fn refresh_lockfile(&self) -> ReleaseResult<()> {
    let args = ["install", "--package-lock-only"];
    tracing::debug!(cwd = %self.work_dir.display(), "{} {}", self.program, args.join(" "));

    let output = Command::new(self.executable())
      .current_dir(&self.work_dir)
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute {}", self.program))?;

    if !output.status.success() {
      return Err(ReleaseError::Command {
        program: self.program.clone(),
        args: args.iter().map(|s| s.to_string()).collect(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      });
    }

    Ok(())
  }

  /// npm ships as a `.cmd` shim on Windows
  fn executable(&self) -> String {
    if cfg!(target_os = "windows") && Path::new(&self.program).extension().is_none() {
      format!("{}.cmd", self.program)
    } else {
      self.program.clone()
    }
  }
}
