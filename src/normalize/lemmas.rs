//! Operation words to dictionary form ("subtracted" -> "subtract").

use log::debug;

use crate::errors::TextMathError;
use crate::normalize::join_words;
use crate::resources::Resources;
use crate::syntax::DependencyParser;

/// Lower-case `text`, then replace every token whose base form is an operation
/// word by that base form. All other tokens keep their surface form.
pub fn canonicalize_operations<P>(
    parser: &P,
    resources: &Resources,
    text: &str,
) -> Result<String, TextMathError>
where
    P: DependencyParser + ?Sized,
{
    let sentence = parser.parse(&text.to_lowercase())?;
    let words: Vec<&str> = sentence
        .tokens()
        .iter()
        .map(|t| {
            if resources.is_operation(&t.lemma) {
                t.lemma.as_str()
            } else {
                t.text.as_str()
            }
        })
        .collect();

    let normalized = join_words(&words);
    debug!("canonicalized operations: {:?}", normalized);
    Ok(normalized)
}
