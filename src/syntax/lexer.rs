//! Lexer - splits a sentence into word, number and punctuation lexemes.
//!
//! The grammar lives in `grammar.pest`; this module only walks the pairs.

use crate::errors::{ErrorReporting, ReportContext, SourceContext, TextMathError};
use crate::syntax::Span;
use pest::{error::InputLocation, Parser};
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct TextLexer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeKind {
    Word,
    Number,
    Punct,
}

/// A lexeme borrowed from the input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme<'a> {
    pub text: &'a str,
    pub kind: LexemeKind,
    pub span: Span,
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Split `text` into lexemes. Empty or whitespace-only text is an input error.
pub fn lex(text: &str) -> Result<Vec<Lexeme<'_>>, TextMathError> {
    let context = ReportContext::new(SourceContext::from_input(text), "lex");
    if text.trim().is_empty() {
        return Err(context.empty_input());
    }

    let mut pairs =
        TextLexer::parse(Rule::text, text).map_err(|e| convert_lex_error(e, &context))?;
    let Some(root) = pairs.next() else {
        return Err(context.empty_input());
    };

    let lexemes = root
        .into_inner()
        .filter_map(|pair| {
            let kind = match pair.as_rule() {
                Rule::number => LexemeKind::Number,
                Rule::word => LexemeKind::Word,
                Rule::punct => LexemeKind::Punct,
                _ => return None,
            };
            let span = pair.as_span();
            Some(Lexeme {
                text: pair.as_str(),
                kind,
                span: Span {
                    start: span.start(),
                    end: span.end(),
                },
            })
        })
        .collect();

    Ok(lexemes)
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

fn convert_lex_error(error: pest::error::Error<Rule>, context: &ReportContext) -> TextMathError {
    let span = match &error.location {
        InputLocation::Pos(p) => miette::SourceSpan::from(*p..*p),
        InputLocation::Span((s, e)) => miette::SourceSpan::from(*s..*e),
    };
    context.lexical(&error.variant.message(), span)
}
