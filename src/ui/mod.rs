pub mod prompt;

pub use prompt::{BuildChoice, BuildOption, Prompt, TerminalPrompt};
