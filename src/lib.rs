//! Release tooling for the SHiFT Code Manager browser extension
//!
//! - [`release`]: interactive version bump, changelog, packaging, commit, tag and push
//! - [`changelog`]: markdown changelog generated from git tags and commits
//! - [`server`]: local page of random codes for notification testing

pub mod changelog;
pub mod commands;
pub mod core;
pub mod logging;
pub mod release;
pub mod server;
pub mod ui;
pub mod utils;
