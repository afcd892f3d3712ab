//! The textmath Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process;

use clap::Parser;
use log::LevelFilter;
use termcolor::{ColorChoice, StandardStream};

use crate::cli::args::{Command, TextMathArgs};
use crate::engine::Engine;
use crate::errors::{print_error, TextMathError};
use crate::harness::{run_all_cases, HarnessConfig};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = TextMathArgs::parse();
    init_logging(args.verbose);

    let engine = match &args.config {
        Some(path) => Engine::from_config(path),
        None => Ok(Engine::new()),
    };
    let result = engine.and_then(|engine| dispatch(&engine, args.command));

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            print_error(e);
            process::exit(1);
        }
    }
}

/// `RUST_LOG` wins when set; otherwise `-v` flags pick the level.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();
    let _ = builder.try_init();
}

/// Run one subcommand. `Ok(false)` means it ran but reported failures.
fn dispatch(engine: &Engine, command: Command) -> Result<bool, TextMathError> {
    let color = color_choice();
    let mut stdout = StandardStream::stdout(color);
    match command {
        Command::Extract { words, json } => {
            let extraction = engine.extract(&words.join(" "))?;
            output::print_extraction(&mut stdout, &extraction, json).map_err(stdout_error)?;
            Ok(true)
        }
        Command::Tree { words, json } => {
            let trace = engine.trace(&words.join(" "))?;
            if json {
                let tree = serde_json::to_string_pretty(&trace.sentence)
                    .map_err(|e| stdout_error(e.into()))?;
                writeln!(stdout, "{}", tree).map_err(stdout_error)?;
            } else {
                output::print_tree(&mut stdout, &trace.sentence).map_err(stdout_error)?;
            }
            Ok(true)
        }
        Command::Trace { words } => {
            let trace = engine.trace(&words.join(" "))?;
            output::print_trace(&mut stdout, &trace).map_err(stdout_error)?;
            Ok(true)
        }
        Command::Batch { file, json } => handle_batch(engine, &file, json, &mut stdout),
        Command::Check { path, filter } => {
            let config = HarnessConfig {
                case_root: path,
                color,
            };
            let (_, failed, _) = run_all_cases(engine, filter.as_deref(), &config);
            Ok(failed == 0)
        }
        Command::Vocabulary => {
            output::print_vocabulary(&mut stdout, engine.resources()).map_err(stdout_error)?;
            Ok(true)
        }
    }
}

/// Handles the `batch` subcommand. Every line is attempted; failing lines are
/// reported on stderr and make the run fail.
fn handle_batch(
    engine: &Engine,
    path: &Path,
    json: bool,
    stdout: &mut StandardStream,
) -> Result<bool, TextMathError> {
    let source = std::fs::read_to_string(path).map_err(|e| TextMathError::io(path, &e))?;
    let mut all_ok = true;

    for (line, result) in engine.extract_all(source.lines()) {
        match result {
            Ok(extraction) if json => {
                writeln!(stdout, "{}", extraction.to_json()).map_err(stdout_error)?;
            }
            Ok(extraction) => {
                writeln!(stdout, "# line {}", line).map_err(stdout_error)?;
                output::print_extraction(stdout, &extraction, false).map_err(stdout_error)?;
            }
            Err(e) => {
                all_ok = false;
                eprintln!("line {}: {}", line, e);
            }
        }
    }
    Ok(all_ok)
}

/// Colors only when stdout is a terminal.
fn color_choice() -> ColorChoice {
    if io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

fn stdout_error(e: io::Error) -> TextMathError {
    TextMathError::io(Path::new("<stdout>"), &e)
}
