//! Defines the command-line arguments and subcommands for the textmath CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "textmath",
    version,
    about = "Extract ordered arithmetic operations from plain-English instructions."
)]
pub struct TextMathArgs {
    /// YAML file overriding the operation vocabulary, wrapper verbs or placeholder.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract the operation clusters of one sentence.
    Extract {
        /// The instruction, e.g. "add the sum of 3 and 4 to 5".
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
        /// Print the clusters as JSON instead of one cluster per line.
        #[arg(long)]
        json: bool,
    },
    /// Show the dependency tree the extractor walks for a sentence.
    Tree {
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
        /// Print the tree as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show every rewriting stage of the pipeline with colored diffs.
    Trace {
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },
    /// Extract every line of a file.
    Batch {
        /// One instruction per line; blank lines and `#` comments are skipped.
        #[arg(required = true)]
        file: PathBuf,
        /// Print one JSON document per line.
        #[arg(long)]
        json: bool,
    },
    /// Discover and run YAML regression cases.
    Check {
        /// A case file or a directory searched recursively.
        #[arg(default_value = "tests/cases")]
        path: PathBuf,
        /// Only run cases whose name contains this substring.
        #[arg(long)]
        filter: Option<String>,
    },
    /// List the operation words, wrapper verbs and placeholder in effect.
    Vocabulary,
}
