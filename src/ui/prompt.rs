//! Interactive prompts for the release flow
//!
//! Stdin is read on a helper thread so Ctrl+C (delivered through `ctrlc`) can
//! interrupt a pending prompt and surface as a cancellation the release can
//! roll back, rather than killing the process mid-release.

use crate::core::error::{ReleaseError, ReleaseResult};
use crate::release::version::Bump;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

/// What the operator wants to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildChoice {
  /// Package the current version with a test suffix, no repository changes
  Test,
  /// Bump, regenerate the changelog, package, commit, tag and push
  Release(Bump),
}

/// One entry of the build-type menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOption {
  pub choice: BuildChoice,
  pub label: String,
}

/// Operator interaction used by the release workflow
pub trait Prompt {
  /// Pick one of `options`; the first option is the default
  fn choose_build(&mut self, options: &[BuildOption]) -> ReleaseResult<BuildChoice>;

  /// Block until the operator approves; any refusal is a cancellation error
  fn confirm(&mut self, message: &str) -> ReleaseResult<()>;

  /// Whether the operator asked to stop since the last prompt
  fn interrupted(&self) -> bool {
    false
  }
}

/// Map raw menu input to an option index; empty input selects the default
pub fn parse_selection(input: &str, option_count: usize) -> Option<usize> {
  let input = input.trim();
  if input.is_empty() {
    return (option_count > 0).then_some(0);
  }
  match input.parse::<usize>() {
    Ok(n) if (1..=option_count).contains(&n) => Some(n - 1),
    _ => None,
  }
}

/// "1, 2, or 3" style list of valid answers
pub fn selection_hint(option_count: usize) -> String {
  let numbers: Vec<String> = (1..=option_count).map(|n| n.to_string()).collect();
  match numbers.as_slice() {
    [] => String::new(),
    [only] => only.clone(),
    [first, second] => format!("{} or {}", first, second),
    [rest @ .., last] => format!("{}, or {}", rest.join(", "), last),
  }
}

enum Input {
  Line(String),
  Eof,
  Interrupt,
}

/// Prompt reading from the terminal
pub struct TerminalPrompt {
  sender: Sender<Input>,
  events: Receiver<Input>,
  interrupted: Arc<AtomicBool>,
}

impl TerminalPrompt {
  /// Create the prompt and install the process-wide Ctrl+C handler
  ///
  /// Can only be called once per process.
  pub fn install() -> ReleaseResult<Self> {
    let (sender, events) = mpsc::channel();
    let interrupted = Arc::new(AtomicBool::new(false));

    let handler_sender = sender.clone();
    let handler_flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || {
      handler_flag.store(true, Ordering::SeqCst);
      let _ = handler_sender.send(Input::Interrupt);
    })
    .map_err(|e| ReleaseError::message(format!("Failed to install Ctrl+C handler: {}", e)))?;

    Ok(Self {
      sender,
      events,
      interrupted,
    })
  }

  /// Print `prompt` and wait for a line; `None` on end of input
  fn read_line(&mut self, prompt: &str) -> ReleaseResult<Option<String>> {
    if self.interrupted() {
      return Err(ReleaseError::cancelled());
    }

    print!("{}", prompt);
    io::stdout().flush()?;

    let sender = self.sender.clone();
    thread::spawn(move || {
      let mut line = String::new();
      let input = match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => Input::Eof,
        Ok(_) => Input::Line(line),
      };
      let _ = sender.send(input);
    });

    match self.events.recv() {
      Ok(Input::Line(line)) => Ok(Some(line.trim().to_string())),
      Ok(Input::Eof) => Ok(None),
      Ok(Input::Interrupt) | Err(_) => {
        println!();
        Err(ReleaseError::cancelled())
      }
    }
  }
}

impl Prompt for TerminalPrompt {
  fn choose_build(&mut self, options: &[BuildOption]) -> ReleaseResult<BuildChoice> {
    println!("What kind of build do you want to create?\n");
    for (idx, option) in options.iter().enumerate() {
      println!("{}) {}", idx + 1, option.label);
    }

    let question = format!("Select option [1-{}, default 1]: ", options.len());
    loop {
      let Some(line) = self.read_line(&question)? else {
        println!();
        return Err(ReleaseError::cancelled());
      };
      if let Some(idx) = parse_selection(&line, options.len()) {
        return Ok(options[idx].choice);
      }
      println!("Please enter {}.", selection_hint(options.len()));
    }
  }

  fn confirm(&mut self, message: &str) -> ReleaseResult<()> {
    match self.read_line(message)? {
      Some(_) => Ok(()),
      None => {
        println!();
        Err(ReleaseError::cancelled())
      }
    }
  }

  fn interrupted(&self) -> bool {
    self.interrupted.load(Ordering::SeqCst)
  }
}
