//! Integration tests for shift-tools
//!
//! Each module drives real git repositories in temporary directories, the
//! compiled `shift-release` binary, or the HTTP router in-process.

mod test_changelog;
mod test_release;
