//! Numeral placeholder substitution.
//!
//! Bare single-digit numerals are swapped for a fixed noun before the final parse
//! so they always land in the tree as nouns. The digits are remembered by token
//! position and restored when operands are reported.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::errors::TextMathError;
use crate::normalize::join_words;
use crate::resources::Resources;
use crate::syntax::DependencyParser;

/// Token position -> the digit that stood there before substitution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DigitMap(BTreeMap<usize, String>);

impl DigitMap {
    pub fn get(&self, position: usize) -> Option<&str> {
        self.0.get(&position).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Output of the substitution stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub text: String,
    pub digits: DigitMap,
}

/// Replace every numeral-like token of exactly one character with the placeholder.
pub fn substitute_numerals<P>(
    parser: &P,
    resources: &Resources,
    text: &str,
) -> Result<Substitution, TextMathError>
where
    P: DependencyParser + ?Sized,
{
    let sentence = parser.parse(text)?;
    let mut digits = BTreeMap::new();
    let words: Vec<&str> = sentence
        .tokens()
        .iter()
        .map(|t| {
            if t.like_num && t.text.chars().count() == 1 {
                digits.insert(t.index, t.text.clone());
                resources.placeholder()
            } else {
                t.text.as_str()
            }
        })
        .collect();

    let substitution = Substitution {
        text: join_words(&words),
        digits: DigitMap(digits),
    };
    debug!(
        "substituted {} numeral(s): {:?}",
        substitution.digits.len(),
        substitution.text
    );
    Ok(substitution)
}
