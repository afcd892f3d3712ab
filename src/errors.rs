//! textmath Error Handling - Unified Encapsulated API
//!
//! Every failure in the pipeline is a `TextMathError`: what went wrong (`ErrorKind`),
//! where it happened (`SourceInfo`), and how to help (`DiagnosticInfo`).

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// The text an error points into, with a display name.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Create a source context for a sentence handed to the pipeline
    pub fn from_input(content: impl Into<String>) -> Self {
        Self {
            name: "input".to_string(),
            content: content.into(),
        }
    }

    /// Create a source context from real file content
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Convert to NamedSource for use with miette error reporting
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

impl Default for SourceContext {
    fn default() -> Self {
        Self::from_input("")
    }
}

/// The single error type
#[derive(Debug)]
pub struct TextMathError {
    /// What went wrong
    pub kind: ErrorKind,
    /// Where it happened
    pub source_info: SourceInfo,
    /// How to help
    pub diagnostic_info: DiagnosticInfo,
}

/// All error types as a clean enum
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    // Input errors - the parser collaborator could not produce a tree
    #[error("Input error: nothing to parse")]
    EmptyInput,
    #[error("Input error: unreadable text ({message})")]
    Lexical { message: String },

    // Tree errors - a parser produced something that is not a dependency tree
    #[error("Tree error: malformed dependency tree ({reason})")]
    MalformedTree { reason: String },

    // Configuration errors
    #[error("Configuration error: {reason}")]
    InvalidResources { reason: String },
    #[error("I/O error on '{path}': {message}")]
    Io { path: String, message: String },
}

/// Context-specific source information
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
    pub phase: String,
}

/// Diagnostic enhancement data
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

/// Context-aware error creation
pub trait ErrorReporting {
    /// Create an error with context-appropriate enhancements
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> TextMathError;

    fn empty_input(&self) -> TextMathError {
        let mut error = self.report(ErrorKind::EmptyInput, unspanned());
        error.diagnostic_info.help =
            Some("Give an instruction such as \"add the sum of 3 and 4 to 5\".".into());
        error
    }

    fn lexical(&self, message: &str, span: SourceSpan) -> TextMathError {
        self.report(
            ErrorKind::Lexical {
                message: message.into(),
            },
            span,
        )
    }

    fn malformed_tree(&self, reason: &str) -> TextMathError {
        let mut error = self.report(
            ErrorKind::MalformedTree {
                reason: reason.into(),
            },
            unspanned(),
        );
        error.diagnostic_info.help =
            Some("The dependency parser must return exactly one root and no cycles.".into());
        error
    }

    fn invalid_resources(&self, reason: &str) -> TextMathError {
        self.report(
            ErrorKind::InvalidResources {
                reason: reason.into(),
            },
            unspanned(),
        )
    }
}

impl ErrorKind {
    /// Get the error category for test assertions
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyInput | Self::Lexical { .. } => ErrorCategory::Input,
            Self::MalformedTree { .. } => ErrorCategory::Tree,
            Self::InvalidResources { .. } | Self::Io { .. } => ErrorCategory::Config,
        }
    }

    /// Get error code suffix for diagnostic codes
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::Lexical { .. } => "lexical",
            Self::MalformedTree { .. } => "malformed_tree",
            Self::InvalidResources { .. } => "invalid_resources",
            Self::Io { .. } => "io",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Tree,
    Config,
}

impl std::error::Error for TextMathError {}

impl fmt::Display for TextMathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Diagnostic for TextMathError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.primary_label()),
            self.source_info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source_info.source)
    }
}

impl TextMathError {
    fn primary_label(&self) -> String {
        match &self.kind {
            ErrorKind::EmptyInput => "empty input".into(),
            ErrorKind::Lexical { .. } => "cannot tokenize here".into(),
            ErrorKind::MalformedTree { .. } => "malformed tree".into(),
            ErrorKind::InvalidResources { .. } => "invalid resources".into(),
            ErrorKind::Io { .. } => "i/o failure".into(),
        }
    }

    /// Wrap an I/O failure on `path`.
    pub fn io(path: &std::path::Path, err: &std::io::Error) -> Self {
        let path = path.display().to_string();
        let context = ReportContext::new(SourceContext::from_file(path.clone(), ""), "io");
        context.report(
            ErrorKind::Io {
                path,
                message: err.to_string(),
            },
            unspanned(),
        )
    }
}

/// Creates a placeholder span for errors not tied to a specific input location.
pub fn unspanned() -> SourceSpan {
    SourceSpan::from(0..0)
}

/// General-purpose error creation context used throughout the pipeline
pub struct ReportContext {
    pub source: SourceContext,
    pub phase: String,
}

impl ReportContext {
    pub fn new(source: SourceContext, phase: impl Into<String>) -> Self {
        Self {
            source,
            phase: phase.into(),
        }
    }
}

impl ErrorReporting for ReportContext {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> TextMathError {
        let error_code = format!("textmath::{}::{}", self.phase, kind.code_suffix());

        TextMathError {
            kind,
            source_info: SourceInfo {
                source: self.source.to_named_source(),
                primary_span: span,
                phase: self.phase.clone(),
            },
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code,
            },
        }
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints a TextMathError with full miette diagnostics
pub fn print_error(error: TextMathError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_builds_phase_scoped_codes() {
        let ctx = ReportContext::new(SourceContext::from_input("add"), "parse");
        let err = ctx.lexical("stray byte", SourceSpan::from(1..2));
        assert_eq!(err.diagnostic_info.error_code, "textmath::parse::lexical");
        assert_eq!(err.kind.category(), ErrorCategory::Input);
        assert_eq!(err.source_info.phase, "parse");
    }

    #[test]
    fn empty_input_carries_help() {
        let ctx = ReportContext::new(SourceContext::from_input(""), "parse");
        let err = ctx.empty_input();
        assert!(err.diagnostic_info.help.is_some());
        assert_eq!(err.to_string(), "Input error: nothing to parse");
    }

    #[test]
    fn io_errors_are_config_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = TextMathError::io(std::path::Path::new("vocab.yaml"), &io);
        assert_eq!(err.kind.category(), ErrorCategory::Config);
        assert!(err.to_string().contains("vocab.yaml"));
    }
}
