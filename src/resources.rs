//! Canonical Resource Construction
//!
//! The operation vocabulary, the wrapper-verb set and the numeral placeholder are
//! built once, validated, and then passed by reference into every extraction.
//! Nothing in the pipeline mutates them.
//!
//! ## Usage Workflow
//! ```rust
//! use textmath::resources::Resources;
//! let resources = Resources::default();
//! assert!(resources.is_operation("subtract"));
//! assert!(resources.is_wrapper("take"));
//! assert_eq!(resources.placeholder(), "number");
//! ```
//!
//! A YAML file can replace or `extend` any of the three:
//! ```yaml
//! extend: true
//! vocabulary: [modulo, exponentiate]
//! wrapper_verbs: [grab]
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::{ErrorReporting, ReportContext, SourceContext, TextMathError};
use crate::syntax::lexicon;

const DEFAULT_VOCABULARY: &[&str] = &[
    "add", "subtract", "multiply", "divide", "sum", "product", "difference", "quotient",
    "remainder", "total", "average", "mean", "square", "cube", "double", "triple", "halve",
    "negate", "increase", "decrease",
];

const DEFAULT_WRAPPER_VERBS: &[&str] = &[
    "take", "find", "set", "get", "use", "compute", "calculate", "determine", "evaluate",
];

const DEFAULT_PLACEHOLDER: &str = "number";

/// Immutable reference data for one extraction engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resources {
    vocabulary: BTreeSet<String>,
    wrapper_verbs: BTreeSet<String>,
    placeholder: String,
}

/// On-disk shape of a resources file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ResourcesFile {
    extend: bool,
    vocabulary: Option<Vec<String>>,
    wrapper_verbs: Option<Vec<String>>,
    placeholder: Option<String>,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            vocabulary: DEFAULT_VOCABULARY.iter().map(|w| w.to_string()).collect(),
            wrapper_verbs: DEFAULT_WRAPPER_VERBS.iter().map(|w| w.to_string()).collect(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl Resources {
    /// Build resources from explicit word lists, validating every entry.
    pub fn new<V, W>(vocabulary: V, wrapper_verbs: W, placeholder: &str) -> Result<Self, TextMathError>
    where
        V: IntoIterator,
        V::Item: AsRef<str>,
        W: IntoIterator,
        W::Item: AsRef<str>,
    {
        let context = ReportContext::new(SourceContext::from_input(""), "resources");
        let resources = Self {
            vocabulary: normalize_words(vocabulary, "vocabulary", &context)?,
            wrapper_verbs: normalize_words(wrapper_verbs, "wrapper verb", &context)?,
            placeholder: placeholder.trim().to_lowercase(),
        };
        resources.validate(&context)?;
        Ok(resources)
    }

    /// Parse a YAML resources document. Missing keys keep the defaults; with
    /// `extend: true` listed words are added to the defaults instead of replacing them.
    pub fn from_yaml_str(source: &str, name: &str) -> Result<Self, TextMathError> {
        let context = ReportContext::new(SourceContext::from_file(name, source), "resources");
        let file: ResourcesFile = if source.trim().is_empty() {
            ResourcesFile::default()
        } else {
            serde_yaml::from_str(source)
                .map_err(|e| context.invalid_resources(&format!("{}: {}", name, e)))?
        };

        let defaults = Self::default();
        let merge = |listed: Option<Vec<String>>, base: &BTreeSet<String>| -> Vec<String> {
            match listed {
                Some(words) if file.extend => base.iter().cloned().chain(words).collect(),
                Some(words) => words,
                None => base.iter().cloned().collect(),
            }
        };

        let vocabulary = merge(file.vocabulary, &defaults.vocabulary);
        let wrapper_verbs = merge(file.wrapper_verbs, &defaults.wrapper_verbs);
        let placeholder = file.placeholder.unwrap_or(defaults.placeholder);

        let resources = Self {
            vocabulary: normalize_words(vocabulary, "vocabulary", &context)?,
            wrapper_verbs: normalize_words(wrapper_verbs, "wrapper verb", &context)?,
            placeholder: placeholder.trim().to_lowercase(),
        };
        resources.validate(&context)?;
        info!(
            "loaded resources from {}: {} operation words, {} wrapper verbs",
            name,
            resources.vocabulary.len(),
            resources.wrapper_verbs.len()
        );
        Ok(resources)
    }

    /// Load resources from a YAML file.
    pub fn load(path: &Path) -> Result<Self, TextMathError> {
        let source = std::fs::read_to_string(path).map_err(|e| TextMathError::io(path, &e))?;
        Self::from_yaml_str(&source, &path.display().to_string())
    }

    /// Admit harvested glossary terms: single words not already known.
    /// Returns the words that were added.
    pub fn absorb_glossary_terms<I>(&mut self, terms: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut admitted = Vec::new();
        for term in terms {
            let word = term.as_ref().trim().to_lowercase();
            if word.is_empty()
                || word.contains(char::is_whitespace)
                || word == self.placeholder
                || self.vocabulary.contains(&word)
            {
                continue;
            }
            info!("adding the word {} to the vocabulary", word);
            self.vocabulary.insert(word.clone());
            admitted.push(word);
        }
        admitted
    }

    pub fn is_operation(&self, word: &str) -> bool {
        self.vocabulary.contains(word)
    }

    pub fn is_wrapper(&self, word: &str) -> bool {
        self.wrapper_verbs.contains(word)
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.iter().map(String::as_str)
    }

    pub fn wrapper_verbs(&self) -> impl Iterator<Item = &str> {
        self.wrapper_verbs.iter().map(String::as_str)
    }

    fn validate(&self, context: &ReportContext) -> Result<(), TextMathError> {
        if self.placeholder.is_empty() || !self.placeholder.chars().all(char::is_alphabetic) {
            return Err(context.invalid_resources(&format!(
                "placeholder '{}' must be a single alphabetic word",
                self.placeholder
            )));
        }
        if self.vocabulary.contains(&self.placeholder) {
            return Err(context.invalid_resources(&format!(
                "placeholder '{}' is also an operation word",
                self.placeholder
            )));
        }
        if self.wrapper_verbs.contains(&self.placeholder) {
            return Err(context.invalid_resources(&format!(
                "placeholder '{}' is also a wrapper verb",
                self.placeholder
            )));
        }
        if !lexicon::is_plain_noun(&self.placeholder) {
            return Err(context.invalid_resources(&format!(
                "placeholder '{}' would not be read as a noun",
                self.placeholder
            )));
        }
        Ok(())
    }
}

fn normalize_words<I>(
    words: I,
    what: &str,
    context: &ReportContext,
) -> Result<BTreeSet<String>, TextMathError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out = BTreeSet::new();
    for word in words {
        let word = word.as_ref().trim().to_lowercase();
        if word.is_empty() {
            return Err(context.invalid_resources(&format!("empty {} entry", what)));
        }
        if word.contains(char::is_whitespace) {
            return Err(context.invalid_resources(&format!(
                "{} entry '{}' must be a single word",
                what, word
            )));
        }
        out.insert(word);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn defaults_cover_the_core_operations() {
        let r = Resources::default();
        for word in ["add", "subtract", "multiply", "divide", "sum", "product"] {
            assert!(r.is_operation(word), "{word}");
        }
        assert!(!r.is_operation("take"));
        assert!(r.is_wrapper("take") && r.is_wrapper("find"));
        assert!(!r.is_operation(r.placeholder()));
    }

    #[test]
    fn yaml_replaces_by_default() {
        let r = Resources::from_yaml_str("vocabulary: [Modulo]\n", "test.yaml").unwrap();
        assert_eq!(r.vocabulary().collect::<Vec<_>>(), vec!["modulo"]);
        assert!(r.is_wrapper("take"));
    }

    #[test]
    fn yaml_extend_merges_with_defaults() {
        let src = "extend: true\nvocabulary: [modulo]\nwrapper_verbs: [grab]\nplaceholder: apple\n";
        let r = Resources::from_yaml_str(src, "test.yaml").unwrap();
        assert!(r.is_operation("modulo") && r.is_operation("add"));
        assert!(r.is_wrapper("grab") && r.is_wrapper("take"));
        assert_eq!(r.placeholder(), "apple");
    }

    #[test]
    fn empty_yaml_means_defaults() {
        assert_eq!(Resources::from_yaml_str("", "e.yaml").unwrap(), Resources::default());
    }

    #[test]
    fn rejects_bad_entries() {
        let multi = Resources::from_yaml_str("vocabulary: [square root]\n", "t.yaml").unwrap_err();
        assert!(matches!(multi.kind, ErrorKind::InvalidResources { .. }));

        let clash = Resources::from_yaml_str("placeholder: sum\n", "t.yaml").unwrap_err();
        assert!(clash.to_string().contains("also an operation word"));

        assert!(Resources::from_yaml_str("placeholder: '7'\n", "t.yaml").is_err());
        assert!(Resources::from_yaml_str("placeholder: x\n", "t.yaml").is_err());
        assert!(Resources::from_yaml_str("unknown_key: 1\n", "t.yaml").is_err());
    }

    #[test]
    fn placeholder_must_read_as_a_noun() {
        let defaults = Resources::default();
        let build = |placeholder: &str| {
            Resources::new(defaults.vocabulary(), defaults.wrapper_verbs(), placeholder)
        };
        for word in ["then", "and", "the", "it", "of", "first", "one", "this", "set", "x"] {
            let err = build(word).unwrap_err();
            assert!(matches!(err.kind, ErrorKind::InvalidResources { .. }), "{word}");
        }
        assert!(build("take")
            .unwrap_err()
            .to_string()
            .contains("also a wrapper verb"));
        assert!(build("apple").is_ok());
        assert!(build("numbers").is_ok());

        let custom_wrapper = Resources::new(["add"], ["grab"], "grab").unwrap_err();
        assert!(custom_wrapper.to_string().contains("also a wrapper verb"));
    }

    #[test]
    fn glossary_terms_skip_phrases_and_known_words() {
        let mut r = Resources::default();
        let added = r.absorb_glossary_terms(["Modulo", "sum", "square root", "", "modulo"]);
        assert_eq!(added, vec!["modulo".to_string()]);
        assert!(r.is_operation("modulo"));
    }

    #[test]
    fn explicit_construction_validates() {
        let r = Resources::new(["Add"], ["take"], "apple").unwrap();
        assert!(r.is_operation("add"));
        assert!(Resources::new(["add"], ["take"], "add").is_err());
    }
}
