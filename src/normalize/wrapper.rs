//! Wrapper-verb resolution.
//!
//! "take the product of 3 and 4 and the sum of 5 and 6 and add them" has "take" as
//! its root, but the operation is "add". The conjunct verb replaces the root and
//! its own clause fragment ("and add them") is dropped:
//! "add the product of 3 and 4 and the sum of 5 and 6".

use log::debug;

use crate::errors::TextMathError;
use crate::normalize::join_words;
use crate::resources::Resources;
use crate::syntax::{Dep, DependencyParser, Pos, Sentence};

/// Parse `text` and, if its root is a wrapper verb with a coordinated operation
/// verb, rewrite it around that verb. Otherwise the text is returned unchanged.
pub fn resolve_wrapper<P>(parser: &P, resources: &Resources, text: &str) -> Result<String, TextMathError>
where
    P: DependencyParser + ?Sized,
{
    let sentence = parser.parse(text)?;
    match rewrite(&sentence, resources) {
        Some(words) => {
            let resolved = join_words(&words);
            debug!("resolved wrapper verb: {:?} -> {:?}", text, resolved);
            Ok(resolved)
        }
        None => Ok(text.to_string()),
    }
}

/// The rewritten word list, or `None` when no wrapper applies.
///
/// Only the root's first conjunct is considered. The conjunct is removed along
/// with the connectors directly before it and one pronoun directly after it; the
/// removal never reaches back to the root itself. A conjunct that takes its own
/// object or prepositional phrase ("and then add 5") stays a separate clause.
pub fn rewrite(sentence: &Sentence, resources: &Resources) -> Option<Vec<String>> {
    let root = sentence.root()?;
    if !resources.is_wrapper(&root.text) {
        return None;
    }
    let conjunct = sentence.children(root).find(|c| c.dep == Dep::Conj)?;
    if resources.is_wrapper(&conjunct.text) {
        return None;
    }

    let tokens = sentence.tokens();
    let mut first = conjunct.index;
    while first > root.index + 1
        && matches!(tokens[first - 1].pos, Pos::Cconj | Pos::Adv | Pos::Punct)
    {
        first -= 1;
    }
    let last = match tokens.get(conjunct.index + 1).map(|t| t.pos) {
        None | Some(Pos::Cconj | Pos::Adv | Pos::Punct) => conjunct.index,
        Some(Pos::Pron) => conjunct.index + 1,
        Some(_) => return None,
    };

    let words = tokens
        .iter()
        .filter(|t| t.index < first || t.index > last)
        .map(|t| {
            if t.index == root.index {
                conjunct.text.clone()
            } else {
                t.text.clone()
            }
        })
        .collect();
    Some(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::RuleParser;

    fn run(text: &str) -> String {
        resolve_wrapper(&RuleParser, &Resources::default(), text).unwrap()
    }

    #[test]
    fn swaps_wrapper_for_conjunct_operation() {
        assert_eq!(
            run("take the product of 3 and 4 and the sum of 5 and 6 and add them"),
            "add the product of 3 and 4 and the sum of 5 and 6"
        );
    }

    #[test]
    fn keeps_later_clauses() {
        assert_eq!(
            run("take the product of 3 and 4 and add them and then subtract it from 9"),
            "add the product of 3 and 4 and then subtract it from 9"
        );
    }

    #[test]
    fn drops_connector_runs_before_the_conjunct() {
        assert_eq!(
            run("set x to the sum of 3 and 4 and then multiply it by the sum of 5 and 6"),
            "multiply x to the sum of 3 and 4 by the sum of 5 and 6"
        );
    }

    #[test]
    fn non_wrapper_roots_pass_through() {
        let text = "subtract the product of 3 and 4 from the sum of 5 and 6";
        assert_eq!(run(text), text);
    }

    #[test]
    fn wrapper_without_conjunct_passes_through() {
        let text = "find the sum of 3 and 4";
        assert_eq!(run(text), text);
    }

    #[test]
    fn conjunct_with_its_own_object_is_left_alone() {
        for text in [
            "find the sum of 3 and 4 and then add 5",
            "take the sum of 1 and 2 and then add 3",
            "take the product of 3 and 4 and add to 9",
        ] {
            assert_eq!(run(text), text);
        }
    }

    #[test]
    fn trailing_punctuation_still_resolves() {
        assert_eq!(
            run("take the sum of 3 and 4 and add , then subtract it from 9"),
            "add the sum of 3 and 4 , then subtract it from 9"
        );
    }

    #[test]
    fn double_wrapper_is_left_alone() {
        let text = "take the sum of 3 and 4 and find it";
        assert_eq!(run(text), text);
    }
}
