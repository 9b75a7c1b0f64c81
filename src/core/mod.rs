//! Core building blocks shared by the release tooling
//!
//! - **config**: Release configuration (paths, package entries) with optional release.toml overrides
//! - **error**: Unified error type with context helpers
//! - **npm**: Package-manager invocation for lockfile refreshes
//! - **vcs**: Git operations through the system git binary (SystemGit)

pub mod config;
pub mod error;
pub mod npm;
pub mod vcs;
