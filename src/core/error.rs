//! Error type shared by every release step
//!
//! All failures (precondition violations, subprocess failures, parse failures,
//! operator cancellation) collapse into [`ReleaseError`]. Each one renders as a
//! single human-readable message; the binary prints it as `Error: <message>`
//! and exits with status 1.

use std::fmt;
use std::io;

/// Main error type for release tooling
#[derive(Debug)]
pub enum ReleaseError {
  /// An external program (git, npm) exited unsuccessfully
  Command {
    program: String,
    args: Vec<String>,
    stderr: String,
  },

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ReleaseError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// The operator backed out at a prompt (or pressed Ctrl+C mid-release)
  pub fn cancelled() -> Self {
    ReleaseError::message("Release cancelled.")
  }

  /// Add context to an existing error
  ///
  /// Message errors keep their text and grow a context line; other variants
  /// are folded into a message prefixed with the context.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ReleaseError::Message { message, context, help } => ReleaseError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      other => ReleaseError::message(format!("{}: {}", ctx_str, other)),
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<&str> {
    match self {
      ReleaseError::Message { help, .. } => help.as_deref(),
      _ => None,
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::Command { program, args, stderr } => {
        let stderr = stderr.trim();
        if stderr.is_empty() {
          write!(f, "`{} {}` failed", program, args.join(" "))
        } else {
          write!(f, "{}", stderr)
        }
      }
      ReleaseError::Io(e) => write!(f, "I/O error: {}", e),
      ReleaseError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ReleaseError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReleaseError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ReleaseError {
  fn from(err: io::Error) -> Self {
    ReleaseError::Io(err)
  }
}

impl From<String> for ReleaseError {
  fn from(msg: String) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<&str> for ReleaseError {
  fn from(msg: &str) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<serde_json::Error> for ReleaseError {
  fn from(err: serde_json::Error) -> Self {
    ReleaseError::message(format!("JSON error: {}", err))
  }
}

impl From<toml_edit::de::Error> for ReleaseError {
  fn from(err: toml_edit::de::Error) -> Self {
    ReleaseError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<zip::result::ZipError> for ReleaseError {
  fn from(err: zip::result::ZipError) -> Self {
    ReleaseError::message(format!("Zip archive error: {}", err))
  }
}

impl From<chrono::ParseError> for ReleaseError {
  fn from(err: chrono::ParseError) -> Self {
    ReleaseError::message(format!("Date parse error: {}", err))
  }
}

impl From<std::path::StripPrefixError> for ReleaseError {
  fn from(err: std::path::StripPrefixError) -> Self {
    ReleaseError::message(format!("Path strip prefix error: {}", err))
  }
}

/// Result type alias for release tooling
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ReleaseError>,
{
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Print an error to stderr as `Error: <message>` with optional help text
pub fn print_error(error: &ReleaseError) {
  eprintln!("Error: {}", error);

  if let Some(help) = error.help_message() {
    eprintln!("Help: {}", help);
  }
}
