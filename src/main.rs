use clap::{Parser, Subcommand};
use shift_tools::commands;
use shift_tools::core::error::print_error;
use shift_tools::logging::init_tracing;
use std::path::PathBuf;

/// Bump, package, tag and push a release of the extension
#[derive(Parser)]
#[command(name = "shift-release")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Repository root (defaults to the current directory)
  #[arg(long, global = true, value_name = "DIR")]
  root: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Regenerate CHANGELOG.md from git tags without releasing
  Changelog,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();
  init_tracing("warn");

  let root = cli.root.unwrap_or_else(|| PathBuf::from("."));
  let result = match cli.command {
    None => commands::run_release(&root),
    Some(Commands::Changelog) => commands::run_changelog(&root),
  };

  if let Err(err) = result {
    print_error(&err);
    std::process::exit(1);
  }
}
