//! Release orchestration: version bump, changelog, archives, commit, tag, push
//!
//! [`workflow::ReleaseWorkflow`] ties the pieces together; every other
//! submodule is usable on its own.

pub mod metadata;
pub mod package;
pub mod rollback;
pub mod version;
pub mod workflow;

pub use metadata::MetadataFile;
pub use package::{ArtifactName, Packager, Variant};
pub use rollback::{Rollback, UndoAction};
pub use version::{Bump, ManifestVersion};
pub use workflow::{ReleaseOutcome, ReleaseWorkflow};
