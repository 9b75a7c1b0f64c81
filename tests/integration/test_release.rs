//! Integration tests for the release flow: success, refusal and rollback paths

use crate::helpers::{INITIAL_CHANGELOG, INITIAL_MANIFEST, TestRepo, git, run_shift_release, stderr_of, stdout_of};
use anyhow::Result;
use shift_tools::core::config::ReleaseConfig;
use shift_tools::core::error::{ReleaseError, ReleaseResult};
use shift_tools::release::{Bump, ReleaseOutcome, ReleaseWorkflow};
use shift_tools::ui::{BuildChoice, BuildOption, Prompt};

/// Prompt answering from a script instead of the terminal
struct Scripted {
  choice: BuildChoice,
  approve: bool,
  offered: Vec<String>,
}

impl Scripted {
  fn release(bump: Bump) -> Self {
    Self {
      choice: BuildChoice::Release(bump),
      approve: true,
      offered: Vec::new(),
    }
  }
}

impl Prompt for Scripted {
  fn choose_build(&mut self, options: &[BuildOption]) -> ReleaseResult<BuildChoice> {
    self.offered = options.iter().map(|o| o.label.clone()).collect();
    Ok(self.choice)
  }

  fn confirm(&mut self, _message: &str) -> ReleaseResult<()> {
    if self.approve {
      Ok(())
    } else {
      Err(ReleaseError::cancelled())
    }
  }
}

/// Repository with tag 1.0 on the initial commit and one feature after it
fn released_once() -> Result<TestRepo> {
  let repo = TestRepo::new()?;
  repo.tag_at("1.0", "2025-01-01T12:00:00")?;
  repo.write_file("popup.js", "console.log('copy button');\n")?;
  repo.commit_at("feat: copy button", "2025-01-04T10:00:00")?;
  Ok(repo)
}

fn run(repo: &TestRepo, prompt: Scripted) -> ReleaseResult<ReleaseOutcome> {
  let config = ReleaseConfig::load(&repo.path)?;
  ReleaseWorkflow::new(&config, prompt).run()
}

fn assert_untouched(repo: &TestRepo) -> Result<()> {
  assert_eq!(repo.read_file("manifest.json")?, INITIAL_MANIFEST);
  assert_eq!(repo.read_file("CHANGELOG.md")?, INITIAL_CHANGELOG);
  assert_eq!(repo.status()?, "");
  Ok(())
}

#[test]
fn test_minor_release_commits_tags_and_pushes() -> Result<()> {
  let repo = released_once()?;
  repo.write_file("manifest.firefox.json", &INITIAL_MANIFEST.replace("SHiFT", "Firefox SHiFT"))?;
  repo.commit_at("build: add firefox manifest", "2025-01-05T10:00:00")?;
  let remote = repo.add_remote()?;

  let outcome = run(&repo, Scripted::release(Bump::Minor))?;

  assert_eq!(
    outcome,
    ReleaseOutcome::Released {
      version: "1.1".into(),
      artifacts: vec![
        repo.path.join("dist/shift-code-manager-1.1.zip"),
        repo.path.join("dist/shift-code-manager-1.1-firefox.zip"),
      ],
    }
  );

  assert_eq!(repo.read_file("manifest.json")?, INITIAL_MANIFEST.replace("1.0", "1.1"));
  assert!(repo.read_file("manifest.firefox.json")?.contains("\"version\": \"1.1\""));

  let changelog = repo.read_file("CHANGELOG.md")?;
  assert!(changelog.starts_with("# Changelog\n\n## 1.1 - "));
  assert!(changelog.contains("### Features\n- Copy button ("));
  assert!(changelog.contains("### Chore\n- Add firefox manifest ("));

  assert_eq!(repo.head_subject()?, "chore: release v1.1");
  assert_eq!(repo.tags()?, vec!["1.0", "1.1"]);
  assert_eq!(repo.status()?, "");

  let remote_tags = git(remote.path(), &["tag", "-l"])?;
  assert!(String::from_utf8_lossy(&remote_tags.stdout).lines().any(|t| t == "1.1"));
  let remote_head = git(remote.path(), &["log", "-1", "--pretty=format:%s", "main"])?;
  assert_eq!(String::from_utf8_lossy(&remote_head.stdout), "chore: release v1.1");
  Ok(())
}

#[test]
fn test_menu_previews_bumped_versions() -> Result<()> {
  let repo = released_once()?;
  let config = ReleaseConfig::load(&repo.path)?;
  let mut prompt = Scripted::release(Bump::Major);
  prompt.choice = BuildChoice::Test;

  let mut workflow = ReleaseWorkflow::new(&config, prompt);
  workflow.run()?;

  assert_eq!(
    workflow.prompt().offered,
    vec!["Test build (no version bump)", "Bump major (2.0)", "Bump minor (1.1)"]
  );
  assert_eq!(repo.dist_files()?, vec!["shift-code-manager-1.0-test.zip"]);
  assert_untouched(&repo)?;
  Ok(())
}

#[test]
fn test_rejected_commit_rolls_everything_back() -> Result<()> {
  let repo = released_once()?;
  repo.reject_commits()?;

  let err = run(&repo, Scripted::release(Bump::Major)).unwrap_err();
  assert!(err.to_string().contains("hook says no"), "{}", err);

  assert_untouched(&repo)?;
  assert!(repo.dist_files()?.is_empty());
  assert_eq!(repo.tags()?, vec!["1.0"]);
  assert_eq!(repo.head_subject()?, "feat: copy button");
  Ok(())
}

#[test]
fn test_cancel_at_review_restores_files() -> Result<()> {
  let repo = released_once()?;
  let mut prompt = Scripted::release(Bump::Minor);
  prompt.approve = false;

  let err = run(&repo, prompt).unwrap_err();
  assert_eq!(err.to_string(), "Release cancelled.");

  assert_untouched(&repo)?;
  assert!(repo.dist_files()?.is_empty());
  Ok(())
}

#[test]
fn test_existing_tag_is_refused_before_changes() -> Result<()> {
  let repo = released_once()?;
  repo.tag_at("1.1", "2025-01-04T12:00:00")?;

  let err = run(&repo, Scripted::release(Bump::Minor)).unwrap_err();
  assert_eq!(err.to_string(), "A git tag named 1.1 already exists.");

  assert_untouched(&repo)?;
  assert!(!repo.file_exists("dist"));
  Ok(())
}

#[test]
fn test_dirty_tree_is_refused() -> Result<()> {
  let repo = released_once()?;
  repo.write_file("notes.txt", "scratch\n")?;

  let err = run(&repo, Scripted::release(Bump::Minor)).unwrap_err();
  assert_eq!(
    err.to_string(),
    "Uncommitted changes detected. Please commit or stash them before creating a release build."
  );
  assert_eq!(repo.read_file("manifest.json")?, INITIAL_MANIFEST);
  Ok(())
}

#[test]
fn test_push_failure_keeps_commit_and_drops_tag() -> Result<()> {
  let repo = released_once()?;

  let err = run(&repo, Scripted::release(Bump::Minor)).unwrap_err();
  assert!(err.to_string().starts_with("Failed to push release commit: "), "{}", err);
  assert_eq!(
    err.help_message(),
    Some("Configure an upstream (git push -u origin <branch>) and try again.")
  );

  assert_eq!(repo.head_subject()?, "chore: release v1.1");
  assert_eq!(repo.tags()?, vec!["1.0"]);
  assert_eq!(repo.dist_files()?, vec!["shift-code-manager-1.1.zip"]);
  assert_eq!(repo.read_file("manifest.json")?, INITIAL_MANIFEST.replace("1.0", "1.1"));
  Ok(())
}

#[test]
fn test_tag_push_failure_keeps_pushed_commit_and_drops_tag() -> Result<()> {
  let repo = released_once()?;
  let remote = repo.add_remote()?;
  TestRepo::reject_remote_tags(remote.path())?;

  let err = run(&repo, Scripted::release(Bump::Minor)).unwrap_err();
  assert!(
    err.to_string().starts_with("Release commit pushed, but pushing tags failed: "),
    "{}",
    err
  );

  assert_eq!(repo.head_subject()?, "chore: release v1.1");
  assert_eq!(repo.tags()?, vec!["1.0"]);
  assert_eq!(repo.dist_files()?, vec!["shift-code-manager-1.1.zip"]);

  let remote_head = git(remote.path(), &["log", "-1", "--pretty=format:%s", "main"])?;
  assert_eq!(String::from_utf8_lossy(&remote_head.stdout), "chore: release v1.1");
  let remote_tags = git(remote.path(), &["tag", "-l"])?;
  assert!(String::from_utf8_lossy(&remote_tags.stdout).trim().is_empty());
  Ok(())
}

#[test]
fn test_failed_lockfile_refresh_restores_package_files() -> Result<()> {
  let repo = released_once()?;
  let package_json = "{\"name\":\"shift-code-manager\",\"version\":\"1.0\",\"private\":true}";
  let package_lock = "{\n\t\"lockfileVersion\": 3,\n\t\"version\": \"1.0\"\n}";
  repo.write_file("package.json", package_json)?;
  repo.write_file("package-lock.json", package_lock)?;
  repo.write_file(
    "release.toml",
    "package_manager = \"false\"\nentries = [\"manifest.json\", \"popup.js\", \"assets\", \"CHANGELOG.md\"]\n",
  )?;
  repo.commit_at("build: track npm metadata", "2025-01-05T10:00:00")?;

  let err = run(&repo, Scripted::release(Bump::Minor)).unwrap_err();
  assert_eq!(err.to_string(), "`false install --package-lock-only` failed");

  assert_eq!(repo.read_file("package.json")?, package_json);
  assert_eq!(repo.read_file("package-lock.json")?, package_lock);
  assert_untouched(&repo)?;
  assert!(repo.dist_files()?.is_empty());
  assert_eq!(repo.head_subject()?, "build: track npm metadata");
  Ok(())
}

#[test]
fn test_missing_package_entry_aborts_before_commit() -> Result<()> {
  let repo = released_once()?;
  repo.write_file(
    "release.toml",
    "entries = [\"manifest.json\", \"popup.js\", \"LICENSE\"]\n",
  )?;
  repo.commit_at("chore: package license", "2025-01-05T10:00:00")?;

  let err = run(&repo, Scripted::release(Bump::Minor)).unwrap_err();
  assert_eq!(err.to_string(), "Package entry missing: LICENSE");

  assert_untouched(&repo)?;
  assert!(repo.dist_files()?.is_empty());
  assert_eq!(repo.head_subject()?, "chore: package license");
  Ok(())
}

#[test]
fn test_cli_test_build() -> Result<()> {
  let repo = released_once()?;

  let output = run_shift_release(&repo.path, &[], "1\n")?;
  assert!(output.status.success(), "stderr: {}", stderr_of(&output));

  let stdout = stdout_of(&output);
  assert!(stdout.contains("What kind of build do you want to create?"));
  assert!(stdout.contains("1) Test build (no version bump)"));
  assert!(stdout.contains("2) Bump major (2.0)"));
  assert!(stdout.contains("3) Bump minor (1.1)"));
  assert!(stdout.contains("Select option [1-3, default 1]: "));
  assert!(stdout.contains("✅ Test build ready: dist/shift-code-manager-1.0-test.zip"));

  assert_eq!(repo.dist_files()?, vec!["shift-code-manager-1.0-test.zip"]);
  assert_untouched(&repo)?;
  Ok(())
}

#[test]
fn test_cli_reprompts_then_takes_default() -> Result<()> {
  let repo = released_once()?;

  let output = run_shift_release(&repo.path, &[], "7\n\n")?;
  assert!(output.status.success(), "stderr: {}", stderr_of(&output));
  assert!(stdout_of(&output).contains("Please enter 1, 2, or 3."));
  assert_eq!(repo.dist_files()?, vec!["shift-code-manager-1.0-test.zip"]);
  Ok(())
}

#[test]
fn test_cli_full_release() -> Result<()> {
  let repo = released_once()?;
  let _remote = repo.add_remote()?;

  let output = run_shift_release(&repo.path, &["--root", "."], "3\n\n")?;
  assert!(output.status.success(), "stderr: {}", stderr_of(&output));

  let stdout = stdout_of(&output);
  assert!(stdout.contains("Changelog regenerated with Features/Fixes/Chore/Other sections."));
  assert!(stdout.contains("Review and edit manifest.json and CHANGELOG.md as needed."));
  assert!(stdout.contains("Press Enter to package and commit, or Ctrl+C to cancel: "));
  assert!(stdout.contains("✅ Release ready: dist/shift-code-manager-1.1.zip (tag 1.1 created and pushed)"));
  assert_eq!(repo.tags()?, vec!["1.0", "1.1"]);
  Ok(())
}

#[test]
fn test_cli_end_of_input_cancels() -> Result<()> {
  let repo = released_once()?;

  let output = run_shift_release(&repo.path, &[], "3\n")?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("Error: Release cancelled."));
  assert_untouched(&repo)?;
  assert_eq!(repo.tags()?, vec!["1.0"]);
  Ok(())
}

#[test]
fn test_cli_missing_version_fails() -> Result<()> {
  let repo = released_once()?;
  repo.write_file("manifest.json", "{\n    \"name\": \"SHiFT Code Manager\"\n}\n")?;

  let output = run_shift_release(&repo.path, &[], "1\n")?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("Error: Current manifest version missing"));
  Ok(())
}
