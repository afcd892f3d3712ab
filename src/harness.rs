//! textmath Regression Harness
//!
//! Discovers YAML case files, runs every case through the extraction engine and
//! compares the clusters against the expected JSON shape.
//!
//! # Case Format
//!
//! ```yaml
//! - name: "subtract two nested operations"
//!   input: "Subtract the product of 3 and 4 from the sum of 5 and 6"
//!   expected: [[{product: ["3", "4"]}, {sum: ["5", "6"]}], [{subtract: []}]]
//!   skip: false                          # optional
//!   only: false                          # optional
//! - name: "blank input"
//!   input: ""
//!   expect_error_code: "textmath::lex::empty_input"
//! ```
//!
//! Unquoted numbers in `expected` are read as their decimal text, so `[3, 4]`
//! and `["3", "4"]` mean the same operands.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use textmath::engine::Engine;
//! use textmath::harness::{run_all_cases, HarnessConfig};
//!
//! let (passed, failed, skipped) = run_all_cases(&Engine::new(), None, &HarnessConfig::default());
//! if failed > 0 {
//!     std::process::exit(1);
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use difference::{Changeset, Difference};
use log::{debug, warn};
use miette::Diagnostic;
use serde::Deserialize;
use serde_json::Value;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use walkdir::WalkDir;

use crate::engine::Engine;
use crate::syntax::DependencyParser;

// =============================================================================
// CORE TYPES
// =============================================================================

/// Represents the result of running a single case.
#[derive(Debug, Clone, PartialEq)]
pub enum TestResult {
    Pass {
        file: String,
        name: String,
    },
    Fail {
        file: String,
        name: String,
        error: String,
        /// Pretty JSON of the expected and actual clusters, when both exist.
        diff: Option<(String, String)>,
    },
    Skipped {
        file: String,
        name: String,
        reason: String,
    },
}

impl TestResult {
    pub fn name(&self) -> &str {
        match self {
            Self::Pass { name, .. } | Self::Fail { name, .. } | Self::Skipped { name, .. } => name,
        }
    }
}

/// A single YAML regression case.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TestCase {
    pub name: String,
    pub input: String,
    #[serde(default)]
    pub expected: Option<Value>,
    #[serde(default)]
    pub expect_error: Option<String>,
    #[serde(default)]
    pub expect_error_code: Option<String>,
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub only: bool,
}

/// Where cases live and how the report is printed.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub case_root: PathBuf,
    pub color: ColorChoice,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            case_root: PathBuf::from("tests/cases"),
            color: ColorChoice::Auto,
        }
    }
}

// =============================================================================
// CASE DISCOVERY AND LOADING
// =============================================================================

/// Discovers all YAML files recursively under `root`, in path order. A single
/// file path is returned as-is.
pub fn discover_yaml_files<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

/// Load and parse the cases of one YAML file.
pub fn load_test_cases(path: &Path) -> Result<Vec<TestCase>, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    serde_yaml::from_str::<Vec<TestCase>>(&content)
        .map_err(|e| format!("failed to parse YAML in {}: {}", path.display(), e))
}

/// Helper for skipping logic.
pub fn skip_reason(case: &TestCase, has_only: bool, filter: Option<&str>) -> Option<String> {
    if has_only && !case.only {
        return Some("Not marked 'only' in 'only' mode".to_string());
    }
    if case.skip {
        return Some("Marked 'skip'".to_string());
    }
    if let Some(f) = filter {
        if !case.name.to_lowercase().contains(&f.to_lowercase()) {
            return Some(format!("Filtered out by substring: {}", f));
        }
    }
    None
}

// =============================================================================
// EXECUTION
// =============================================================================

/// Numbers in expected output stand for their decimal text.
fn normalize_expected(value: Value) -> Value {
    match value {
        Value::Number(n) => Value::String(n.to_string()),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_expected).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, normalize_expected(v)))
                .collect(),
        ),
        other => other,
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Run one case through the engine.
pub fn run_test_case<P: DependencyParser>(engine: &Engine<P>, file: &str, case: &TestCase) -> TestResult {
    let fail = |error: String, diff: Option<(String, String)>| TestResult::Fail {
        file: file.to_string(),
        name: case.name.clone(),
        error,
        diff,
    };
    let pass = || TestResult::Pass {
        file: file.to_string(),
        name: case.name.clone(),
    };

    let expects_error = case.expect_error.is_some() || case.expect_error_code.is_some();
    match engine.extract(&case.input) {
        Err(error) => {
            let message = error.to_string();
            let code = error.code().map(|c| c.to_string());
            if let Some(expected) = &case.expect_error_code {
                if code.as_deref() != Some(expected.as_str()) {
                    return fail(
                        format!(
                            "Expected error code '{}', got {} ({})",
                            expected,
                            code.unwrap_or_else(|| "no code".into()),
                            message
                        ),
                        None,
                    );
                }
            }
            if let Some(expected) = &case.expect_error {
                if !message.contains(expected.as_str()) {
                    return fail(
                        format!("Expected error containing '{}', got: {}", expected, message),
                        None,
                    );
                }
            }
            if expects_error {
                pass()
            } else {
                fail(format!("Unexpected error: {}", message), None)
            }
        }
        Ok(extraction) => {
            let actual = extraction.to_json();
            if expects_error {
                return fail(
                    format!("Expected an error but extraction succeeded with {}", actual),
                    None,
                );
            }
            let Some(expected) = case.expected.clone().map(normalize_expected) else {
                return fail("Case has neither 'expected' nor an error expectation".into(), None);
            };
            if expected == actual {
                pass()
            } else {
                fail(
                    "Clusters did not match expected".into(),
                    Some((pretty(&expected), pretty(&actual))),
                )
            }
        }
    }
}

/// Load every case under the configured root and run the ones that are not skipped.
pub fn collect_results<P: DependencyParser>(
    engine: &Engine<P>,
    filter: Option<&str>,
    config: &HarnessConfig,
) -> Vec<TestResult> {
    let mut all_cases = Vec::new();
    let mut results = Vec::new();
    let mut has_only = false;

    for path in discover_yaml_files(&config.case_root) {
        let file = path.display().to_string();
        match load_test_cases(&path) {
            Ok(cases) => {
                debug!("loaded {} case(s) from {}", cases.len(), file);
                has_only |= cases.iter().any(|c| c.only);
                all_cases.extend(cases.into_iter().map(|c| (file.clone(), c)));
            }
            Err(error) => {
                warn!("{}", error);
                results.push(TestResult::Fail {
                    name: file.clone(),
                    file,
                    error,
                    diff: None,
                });
            }
        }
    }

    results.extend(all_cases.into_iter().map(|(file, case)| {
        match skip_reason(&case, has_only, filter) {
            Some(reason) => TestResult::Skipped {
                file,
                name: case.name,
                reason,
            },
            None => run_test_case(engine, &file, &case),
        }
    }));
    results
}

// =============================================================================
// REPORTING
// =============================================================================

/// Partition results by outcome type.
pub fn partition_results(results: &[TestResult]) -> (usize, usize, usize) {
    results.iter().fold((0, 0, 0), |(p, f, s), r| match r {
        TestResult::Pass { .. } => (p + 1, f, s),
        TestResult::Fail { .. } => (p, f + 1, s),
        TestResult::Skipped { .. } => (p, f, s + 1),
    })
}

fn colored<W: WriteColor>(out: &mut W, color: Color, text: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{}", text)?;
    out.reset()
}

/// Write every result and a summary line.
pub fn report_results<W: WriteColor>(results: &[TestResult], out: &mut W) -> io::Result<()> {
    for r in results {
        match r {
            TestResult::Pass { file, name } => {
                colored(out, Color::Green, "PASS")?;
                writeln!(out, ": {} [{}]", name, file)?;
            }
            TestResult::Fail {
                file,
                name,
                error,
                diff,
            } => {
                colored(out, Color::Red, "FAIL")?;
                writeln!(out, ": {} [{}]", name, file)?;
                writeln!(out, "  Error: {}", error)?;
                if let Some((expected, actual)) = diff {
                    writeln!(out, "  Diff (-expected +actual):")?;
                    write_diff(out, expected, actual)?;
                }
            }
            TestResult::Skipped { file, name, reason } => {
                colored(out, Color::Yellow, "SKIP")?;
                writeln!(out, ": {} [{}] ({})", name, file, reason)?;
            }
        }
    }

    let (passed, failed, skipped) = partition_results(results);
    writeln!(out)?;
    write!(out, "Case summary: total {}, ", results.len())?;
    colored(out, Color::Green, "passed")?;
    write!(out, " {}, ", passed)?;
    colored(out, Color::Red, "failed")?;
    write!(out, " {}, ", failed)?;
    colored(out, Color::Yellow, "skipped")?;
    writeln!(out, " {}", skipped)?;

    if failed > 0 {
        writeln!(out, "\nFailed cases:")?;
        for r in results.iter().filter(|r| matches!(r, TestResult::Fail { .. })) {
            writeln!(out, "  - {}", r.name())?;
        }
    }
    Ok(())
}

/// Line diff of two texts.
pub fn write_diff<W: WriteColor>(out: &mut W, expected: &str, actual: &str) -> io::Result<()> {
    let changeset = Changeset::new(expected, actual, "\n");
    for diff in &changeset.diffs {
        let (sign, color, text) = match diff {
            Difference::Same(x) => (' ', None, x),
            Difference::Rem(x) => ('-', Some(Color::Red), x),
            Difference::Add(x) => ('+', Some(Color::Green), x),
        };
        out.set_color(ColorSpec::new().set_fg(color))?;
        for line in text.lines() {
            writeln!(out, "  {}{}", sign, line)?;
        }
        out.reset()?;
    }
    Ok(())
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Run all cases with optional name filtering, print the report to stdout and
/// return `(passed, failed, skipped)`.
pub fn run_all_cases<P: DependencyParser>(
    engine: &Engine<P>,
    filter: Option<&str>,
    config: &HarnessConfig,
) -> (usize, usize, usize) {
    let results = collect_results(engine, filter, config);
    let mut stdout = StandardStream::stdout(config.color);
    if let Err(e) = report_results(&results, &mut stdout) {
        warn!("failed to write case report: {}", e);
    }
    partition_results(&results)
}
