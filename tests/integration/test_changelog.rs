//! Integration tests for changelog generation against real git history

use crate::helpers::{TestRepo, run_shift_release, stderr_of, stdout_of};
use anyhow::Result;
use shift_tools::changelog::{collect_releases, generate_changelog};
use shift_tools::core::vcs::SystemGit;

/// v1.0 and v1.1 tagged, one more commit on top with the manifest at 1.1
fn tagged_history() -> Result<(TestRepo, Vec<String>)> {
  let repo = TestRepo::new()?;
  let mut shas = Vec::new();

  repo.write_file("popup.js", "console.log('badge');\n")?;
  shas.push(repo.commit_at("feat: add popup badge", "2025-01-02T10:00:00")?);
  repo.tag_at("v1.0", "2025-01-02T12:00:00")?;

  repo.write_file("popup.js", "console.log('empty list');\n")?;
  shas.push(repo.commit_at("fix(popup): handle empty code list", "2025-01-05T10:00:00")?);
  shas.push(repo.commit_at("docs: describe notifications", "2025-01-06T10:00:00")?);
  repo.tag_at("v1.1", "2025-01-06T12:00:00")?;

  repo.write_file("manifest.json", &crate::helpers::INITIAL_MANIFEST.replace("1.0", "1.1"))?;
  shas.push(repo.commit_at("feat(api): poll every minute", "2025-01-08T10:00:00")?);

  Ok((repo, shas))
}

#[test]
fn test_changelog_sections_newest_first() -> Result<()> {
  let (repo, shas) = tagged_history()?;
  let git = SystemGit::open(&repo.path)?;

  generate_changelog(&git, &repo.path.join("manifest.json"), &repo.path.join("CHANGELOG.md"))?;

  let expected = format!(
    "# Changelog

## 1.1 (unreleased) - 2025-01-08

### Features
- Poll every minute ({feat_api})

### Fixes
- _

### Chore
- _

### Other
- _

## 1.1 - 2025-01-06

### Features
- _

### Fixes
- Handle empty code list ({fix})

### Chore
- Describe notifications ({docs})

### Other
- _

## 1.0 - 2025-01-02

### Features
- Add popup badge ({feat_badge})

### Fixes
- _

### Chore
- Initial import ({initial})

### Other
- _
",
    feat_api = shas[3],
    fix = shas[1],
    docs = shas[2],
    feat_badge = shas[0],
    initial = initial_sha(&repo)?,
  );

  assert_eq!(repo.read_file("CHANGELOG.md")?, expected);
  Ok(())
}

fn initial_sha(repo: &TestRepo) -> Result<String> {
  let output = crate::helpers::git(&repo.path, &["rev-list", "--max-parents=0", "--abbrev-commit", "HEAD"])?;
  Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[test]
fn test_head_on_latest_tag_adds_no_section() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.commit_at("feat: first feature", "2025-02-01T10:00:00")?;
  repo.tag_at("1.0", "2025-02-01T12:00:00")?;

  let git = SystemGit::open(&repo.path)?;
  let releases = collect_releases(&git, Some("1.0"))?;

  assert_eq!(releases.len(), 1);
  assert_eq!(releases[0].label, "1.0");
  assert_eq!(releases[0].commits.len(), 2);
  Ok(())
}

#[test]
fn test_head_label_uses_bumped_manifest_version() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.tag_at("1.0", "2025-01-01T12:00:00")?;
  repo.commit_at("Tidy up wording", "2025-01-03T10:00:00")?;

  let git = SystemGit::open(&repo.path)?;
  let releases = collect_releases(&git, Some("1.1"))?;

  assert_eq!(releases[0].label, "1.1");
  assert_eq!(releases[0].commits.len(), 1);
  assert_eq!(releases[0].commits[0].summary, "Tidy up wording");

  let releases = collect_releases(&git, None)?;
  assert_eq!(releases[0].label, "Unreleased");
  Ok(())
}

#[test]
fn test_merge_commits_are_skipped() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.tag_at("1.0", "2025-01-01T12:00:00")?;

  crate::helpers::git(&repo.path, &["checkout", "-q", "-b", "topic"])?;
  repo.commit_at("feat: topic work", "2025-01-02T10:00:00")?;
  crate::helpers::git(&repo.path, &["checkout", "-q", "main"])?;
  crate::helpers::git_dated(
    &repo.path,
    &["merge", "-q", "--no-ff", "-m", "Merge branch 'topic'", "topic"],
    "2025-01-03T10:00:00",
  )?;

  let git = SystemGit::open(&repo.path)?;
  let releases = collect_releases(&git, Some("1.1"))?;
  let summaries: Vec<_> = releases[0].commits.iter().map(|c| c.summary.as_str()).collect();
  assert_eq!(summaries, vec!["feat: topic work"]);
  Ok(())
}

#[test]
fn test_no_tags_is_an_error() -> Result<()> {
  let repo = TestRepo::new()?;
  let git = SystemGit::open(&repo.path)?;

  let err = collect_releases(&git, Some("1.0")).unwrap_err();
  assert_eq!(err.to_string(), "No git tags found.");
  Ok(())
}

#[test]
fn test_changelog_command_rewrites_file() -> Result<()> {
  let (repo, _) = tagged_history()?;

  let output = run_shift_release(&repo.path, &["changelog"], "")?;
  assert!(output.status.success(), "stderr: {}", stderr_of(&output));
  assert!(stdout_of(&output).contains("Changelog written to CHANGELOG.md"));

  let changelog = repo.read_file("CHANGELOG.md")?;
  assert!(changelog.starts_with("# Changelog\n\n## 1.1 (unreleased) - 2025-01-08\n"));
  assert!(changelog.ends_with("- _\n"));
  Ok(())
}

#[test]
fn test_changelog_command_outside_repository_fails() -> Result<()> {
  let dir = tempfile::tempdir()?;
  std::fs::write(dir.path().join("manifest.json"), "{\"version\": \"1.0\"}\n")?;

  let output = run_shift_release(dir.path(), &["changelog"], "")?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).starts_with("Error: "));
  Ok(())
}
