//! Text normalization stages that run before the final parse.
//!
//! Each stage parses its input, rewrites the token list, and hands back plain
//! text for the next stage: operation words to base form, wrapper verbs
//! replaced by the operation they coordinate, single digits to a placeholder.

pub mod lemmas;
pub mod numerals;
pub mod wrapper;

pub use lemmas::canonicalize_operations;
pub use numerals::{substitute_numerals, DigitMap, Substitution};
pub use wrapper::resolve_wrapper;

/// Rejoin words with single spaces.
pub(crate) fn join_words<S: AsRef<str>>(words: &[S]) -> String {
    words
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}
