use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::{
    errors::TextMathError,
    extract::{Extraction, Extractor},
    normalize::{canonicalize_operations, resolve_wrapper, substitute_numerals, DigitMap},
    resources::Resources,
    syntax::{DependencyParser, RuleParser, Sentence},
};

// ============================================================================
// PIPELINE TRACE - Every intermediate stage of one extraction
// ============================================================================

/// The text after each rewriting stage, plus the final tree and result.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineTrace {
    pub original: String,
    /// Lower-cased, operation words in base form.
    pub canonical: String,
    /// After wrapper-verb resolution.
    pub resolved: String,
    /// After single-digit placeholder substitution.
    pub substituted: String,
    pub digits: DigitMap,
    /// The tree the extractor walked.
    pub sentence: Sentence,
    pub extraction: Extraction,
}

impl PipelineTrace {
    /// `(stage name, text)` for every text-rewriting stage, in order.
    pub fn stages(&self) -> [(&'static str, &str); 4] {
        [
            ("original", &self.original),
            ("canonical", &self.canonical),
            ("resolved", &self.resolved),
            ("substituted", &self.substituted),
        ]
    }
}

// ============================================================================
// EXTRACTION PIPELINE - Canonicalize → Resolve → Substitute → Parse → Extract
// ============================================================================

/// Unified extraction pipeline. Holds the parser collaborator and the immutable
/// resources; every entry point (library, CLI, regression harness) goes through it.
///
/// The engine keeps no per-sentence state, so one instance can serve any number
/// of sentences, from any number of threads when `P` allows it.
#[derive(Debug, Clone, Default)]
pub struct Engine<P = RuleParser> {
    parser: P,
    resources: Resources,
}

impl Engine<RuleParser> {
    /// Engine with the built-in rule parser and default resources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with the built-in rule parser and resources loaded from YAML.
    pub fn from_config(path: &Path) -> Result<Self, TextMathError> {
        Ok(Self::with_parser(RuleParser, Resources::load(path)?))
    }
}

impl<P: DependencyParser> Engine<P> {
    pub fn with_parser(parser: P, resources: Resources) -> Self {
        Self { parser, resources }
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Extract the ordered operation clusters of one sentence.
    pub fn extract(&self, text: &str) -> Result<Extraction, TextMathError> {
        Ok(self.trace(text)?.extraction)
    }

    /// Run the full pipeline, keeping every intermediate stage.
    pub fn trace(&self, text: &str) -> Result<PipelineTrace, TextMathError> {
        // Step 1: Lower-case and bring operation words to base form.
        let canonical = canonicalize_operations(&self.parser, &self.resources, text)?;

        // Step 2: Rewrite "take X and add them" around the real operation.
        let resolved = resolve_wrapper(&self.parser, &self.resources, &canonical)?;

        // Step 3: Hide single digits behind the placeholder noun.
        let substitution = substitute_numerals(&self.parser, &self.resources, &resolved)?;

        // Step 4: Final parse and extraction.
        let sentence = self.parser.parse(&substitution.text)?;
        let extraction =
            Extractor::new(&sentence, &self.resources, &substitution.digits).extract();
        debug!("extracted {} cluster(s) from {:?}", extraction.len(), text);

        Ok(PipelineTrace {
            original: text.to_string(),
            canonical,
            resolved,
            substituted: substitution.text,
            digits: substitution.digits,
            sentence,
            extraction,
        })
    }

    /// Parse `text` with the engine's parser, without any rewriting.
    pub fn parse(&self, text: &str) -> Result<Sentence, TextMathError> {
        self.parser.parse(text)
    }

    /// Extract every line independently, skipping blank lines and `#` comments.
    /// A failing line does not stop the others; results keep the line order and
    /// carry the 1-based line number.
    pub fn extract_all<'a, I>(&self, lines: I) -> Vec<(usize, Result<Extraction, TextMathError>)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        lines
            .into_iter()
            .enumerate()
            .filter(|(_, line)| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with('#')
            })
            .map(|(i, line)| (i + 1, self.extract(line)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trace_records_every_stage() {
        let trace = Engine::new()
            .trace("Take the product of 3 and 4 and the sum of 5 and 6 and add them")
            .unwrap();
        assert_eq!(
            trace.canonical,
            "take the product of 3 and 4 and the sum of 5 and 6 and add them"
        );
        assert_eq!(trace.resolved, "add the product of 3 and 4 and the sum of 5 and 6");
        assert_eq!(
            trace.substituted,
            "add the product of number and number and the sum of number and number"
        );
        assert_eq!(trace.digits.len(), 4);
        assert_eq!(trace.sentence.root().unwrap().text, "add");
        assert_eq!(
            trace.extraction.to_json(),
            json!([[{"product": ["3", "4"]}, {"sum": ["5", "6"]}], [{"add": []}]])
        );
    }

    #[test]
    fn extract_all_skips_blank_lines_and_keeps_going() {
        let engine = Engine::new();
        let results = engine.extract_all(["add 3 and 4", "", "# comment", "multiply 5 by 6"]);
        let lines: Vec<usize> = results.iter().map(|(n, _)| *n).collect();
        assert_eq!(lines, vec![1, 4]);
        assert!(results.iter().all(|(_, r)| r.is_ok()));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(Engine::new().extract("").is_err());
    }
}
