//! Release command implementation

use crate::core::error::ReleaseResult;
use crate::release::ReleaseWorkflow;
use crate::ui::TerminalPrompt;
use std::path::Path;

/// Run the interactive release flow in `root`
pub fn run_release(root: &Path) -> ReleaseResult<()> {
  let config = super::load_config(root)?;
  let prompt = TerminalPrompt::install()?;

  let outcome = ReleaseWorkflow::new(&config, prompt).run()?;
  tracing::debug!(?outcome, "release finished");
  Ok(())
}
