//! Handles all user-facing output for the CLI.
//!
//! This module is responsible for pretty-printing, colorizing output and
//! generating JSON. Every printer writes to a `WriteColor` so the same code
//! serves the terminal and in-memory buffers.

use std::io;

use difference::{Changeset, Difference};
use termcolor::{Color, ColorSpec, WriteColor};

use crate::engine::PipelineTrace;
use crate::extract::Extraction;
use crate::resources::Resources;
use crate::syntax::Sentence;

// ============================================================================
// CORE OUTPUT FUNCTIONS: User-facing CLI output utilities
// ============================================================================

/// Prints an extraction, either one cluster per line or as compact JSON.
pub fn print_extraction<W: WriteColor>(out: &mut W, extraction: &Extraction, json: bool) -> io::Result<()> {
    if json {
        return writeln!(out, "{}", extraction.to_json());
    }
    if extraction.is_empty() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        writeln!(out, "(no operations)")?;
        return out.reset();
    }
    for (i, cluster) in extraction.clusters().iter().enumerate() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(out, "{}:", i + 1)?;
        out.reset()?;
        writeln!(out, " {}", cluster)?;
    }
    Ok(())
}

/// Prints one row per token: position, text, tags, relation and head.
pub fn print_tree<W: WriteColor>(out: &mut W, sentence: &Sentence) -> io::Result<()> {
    for token in sentence.tokens() {
        let head = match token.head.and_then(|h| sentence.get(h)) {
            Some(head) => format!("{} {}", head.index, head.text),
            None => "-".to_string(),
        };
        write!(
            out,
            "{:>3}  {:<12} {:<12} {:<6} ",
            token.index, token.text, token.lemma, token.pos
        )?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "{:<9}", token.dep)?;
        out.reset()?;
        writeln!(out, " <- {}", head)?;
    }
    Ok(())
}

/// Prints every rewriting stage with a word diff against the previous one,
/// then the digit map and the clusters.
pub fn print_trace<W: WriteColor>(out: &mut W, trace: &PipelineTrace) -> io::Result<()> {
    let mut last: Option<&str> = None;

    for (i, (stage, text)) in trace.stages().iter().enumerate() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
        writeln!(out, "--- Step {}: {} ---", i, stage)?;
        out.reset()?;

        match last {
            Some(previous) if previous != *text => {
                let changeset = Changeset::new(previous, text, " ");
                print_diff(out, &changeset.diffs)?;
            }
            _ => writeln!(out, "{}", text)?,
        }
        last = Some(*text);
        writeln!(out)?;
    }

    if !trace.digits.is_empty() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
        writeln!(out, "--- Digits ---")?;
        out.reset()?;
        for (position, digit) in trace.digits.iter() {
            writeln!(out, "{} -> {}", position, digit)?;
        }
        writeln!(out)?;
    }

    out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
    writeln!(out, "--- Clusters ---")?;
    out.reset()?;
    print_extraction(out, &trace.extraction, false)
}

/// Lists the resources in effect.
pub fn print_vocabulary<W: WriteColor>(out: &mut W, resources: &Resources) -> io::Result<()> {
    heading(out, "Operation words")?;
    for word in resources.vocabulary() {
        writeln!(out, "  {}", word)?;
    }
    heading(out, "Wrapper verbs")?;
    for word in resources.wrapper_verbs() {
        writeln!(out, "  {}", word)?;
    }
    heading(out, "Placeholder")?;
    writeln!(out, "  {}", resources.placeholder())
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn heading<W: WriteColor>(out: &mut W, title: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(out, "{}:", title)?;
    out.reset()
}

/// Word diff on one line: removed words red, added words green.
fn print_diff<W: WriteColor>(out: &mut W, diffs: &[Difference]) -> io::Result<()> {
    for (i, diff) in diffs.iter().enumerate() {
        if i > 0 {
            write!(out, " ")?;
        }
        match diff {
            Difference::Same(x) => {
                out.reset()?;
                write!(out, "{}", x)?;
            }
            Difference::Add(x) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                write!(out, "+[{}]", x)?;
            }
            Difference::Rem(x) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                write!(out, "-[{}]", x)?;
            }
        }
    }
    out.reset()?;
    writeln!(out)
}
