pub mod system_git;
mod system_git_ops;

pub use system_git::SystemGit;

use chrono::NaiveDate;

/// Information about a commit, as read from one `git log` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
  /// Abbreviated hash
  pub sha: String,
  /// Committer date
  pub date: NaiveDate,
  /// First line of the commit message
  pub summary: String,
}
