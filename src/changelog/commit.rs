//! Commit summary classification
//!
//! Pure functions from a one-line summary to a changelog category and a
//! cleaned display string. No git access happens here.

use std::fmt;

/// Changelog section a commit lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
  Features,
  Fixes,
  Chore,
  Other,
}

impl Category {
  /// Render order of the sections inside every release
  pub const ORDER: [Category; 4] = [Category::Features, Category::Fixes, Category::Chore, Category::Other];

  /// Prefixes that select this category, checked case-insensitively
  pub fn prefixes(&self) -> &'static [&'static str] {
    match self {
      Category::Features => &["feat", "feature"],
      Category::Fixes => &["fix", "hotfix", "bug"],
      Category::Chore => &[
        "chore", "build", "ci", "docs", "doc", "refactor", "style", "perf", "test", "tests",
      ],
      Category::Other => &[],
    }
  }

  pub fn display_name(&self) -> &'static str {
    match self {
      Category::Features => "Features",
      Category::Fixes => "Fixes",
      Category::Chore => "Chore",
      Category::Other => "Other",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.display_name())
  }
}

/// A commit summary split into its category and cleaned text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedSummary {
  pub category: Category,
  pub text: String,
}

impl ClassifiedSummary {
  pub fn new(summary: &str) -> Self {
    Self {
      category: categorize(summary),
      text: clean_summary(summary),
    }
  }
}

/// Pick the first category whose prefix starts the summary
///
/// A prefix only counts when followed by `:`, `(` or a space, so `fixup` is
/// not a fix. Anything unmatched is [`Category::Other`].
pub fn categorize(summary: &str) -> Category {
  let lowered = summary.to_lowercase();

  for category in Category::ORDER {
    for prefix in category.prefixes() {
      if let Some(rest) = lowered.strip_prefix(prefix)
        && matches!(rest.chars().next(), Some(':' | '(' | ' '))
      {
        return category;
      }
    }
  }

  Category::Other
}

/// Strip a `type: subject` / `type(scope): subject` prefix and capitalize
///
/// The type must be lowercase ASCII letters and the scope non-empty. When the
/// summary has no such prefix it is kept whole. Only the first character is
/// upper-cased; the rest of the text is untouched.
pub fn clean_summary(summary: &str) -> String {
  match conventional_subject(summary) {
    Some(subject) => capitalize_first(subject.trim()),
    None => capitalize_first(summary),
  }
}

fn conventional_subject(summary: &str) -> Option<&str> {
  let type_len = summary.bytes().take_while(|b| b.is_ascii_lowercase()).count();
  if type_len == 0 {
    return None;
  }

  let mut rest = &summary[type_len..];
  if let Some(scoped) = rest.strip_prefix('(') {
    let close = scoped.find(')')?;
    if close == 0 {
      return None;
    }
    rest = &scoped[close + 1..];
  }

  let subject = rest.strip_prefix(':')?;
  if subject.is_empty() {
    return None;
  }
  Some(subject)
}

fn capitalize_first(text: &str) -> String {
  let mut chars = text.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}
