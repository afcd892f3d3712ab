//! Lexicon - part-of-speech tagging and lemmatization for the arithmetic register.
//!
//! Closed-class words come from fixed tables. Open-class words default to NOUN,
//! except known verbs and the noun/verb dual words ("sum", "square", "set"...),
//! which are verbs only where an imperative clause can begin.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use crate::syntax::lexer::{Lexeme, LexemeKind};
use crate::syntax::Pos;

// ============================================================================
// WORD TABLES
// ============================================================================

fn set(words: &[&'static str]) -> HashSet<&'static str> {
    words.iter().copied().collect()
}

static DETERMINERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "the", "a", "an", "each", "every", "all", "both", "some", "any", "another", "no",
    ])
});

static DEMONSTRATIVES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| set(&["this", "that", "these", "those"]));

static PREPOSITIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "of", "from", "by", "to", "with", "into", "in", "on", "for", "after", "before", "over",
        "under", "than", "at", "as", "between", "plus", "minus", "times", "per",
    ])
});

static CONJUNCTIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| set(&["and", "or", "but"]));

static ADVERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "then", "also", "finally", "afterwards", "again", "together", "now", "lastly",
    ])
});

static PRONOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "it", "them", "they", "its", "itself", "we", "you", "he", "she", "i", "me", "us",
        "him", "her", "their",
    ])
});

static ADJECTIVES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth",
        "tenth", "last", "next", "previous", "other", "same", "whole", "new", "original",
        "resulting", "final", "given", "following",
    ])
});

static NUMBER_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
        "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen",
        "eighteen", "nineteen", "twenty", "thirty", "forty", "fifty", "sixty", "seventy",
        "eighty", "ninety", "hundred", "thousand", "million", "billion", "dozen",
    ])
});

/// Words that are only ever verbs in this register.
static VERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "add", "subtract", "multiply", "divide", "take", "find", "get", "use", "compute",
        "calculate", "raise", "halve", "negate", "evaluate", "determine", "give", "make", "put",
        "store", "assign", "let", "keep",
    ])
});

/// Words that are verbs at the start of a clause and nouns elsewhere.
static DUAL_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "sum", "total", "average", "square", "cube", "double", "triple", "round", "increase",
        "decrease", "set", "count",
    ])
});

static IRREGULAR_VERBS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("took", "take"),
        ("taken", "take"),
        ("found", "find"),
        ("got", "get"),
        ("gotten", "get"),
        ("gave", "give"),
        ("given", "give"),
        ("made", "make"),
        ("kept", "keep"),
    ]
    .into_iter()
    .collect()
});

/// Words after which a dual word opens a new clause.
const CLAUSE_OPENERS: &[&str] = &["then", ",", ";", ":", "."];

// ============================================================================
// PUBLIC API
// ============================================================================

/// Tagging result for one lexeme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagged {
    pub lemma: String,
    pub pos: Pos,
    pub like_num: bool,
}

/// True if `word` is a base-form verb of the lexicon, dual words included.
pub fn is_verb(word: &str) -> bool {
    VERBS.contains(word) || DUAL_WORDS.contains(word)
}

/// True if `word` tags as NOUN in every context.
pub fn is_plain_noun(word: &str) -> bool {
    classify(LexemeKind::Word, word) == WordClass::Fixed(Pos::Noun)
}

/// Tag a lexeme sequence in context.
pub fn tag(lexemes: &[Lexeme<'_>]) -> Vec<Tagged> {
    let lower: Vec<String> = lexemes.iter().map(|l| l.text.to_lowercase()).collect();
    let classes: Vec<WordClass> = lexemes
        .iter()
        .zip(&lower)
        .map(|(l, w)| classify(l.kind, w))
        .collect();

    (0..lexemes.len())
        .map(|i| {
            let word = lower[i].as_str();
            let prev = i.checked_sub(1).map(|p| (lower[p].as_str(), classes[p]));
            let next = classes.get(i + 1).map(|c| (lower[i + 1].as_str(), *c));
            let pos = resolve(word, classes[i], prev, next);
            Tagged {
                lemma: lemma_for(lexemes[i].kind, word, pos),
                pos,
                like_num: lexemes[i].kind == LexemeKind::Number || NUMBER_WORDS.contains(word),
            }
        })
        .collect()
}

/// Base form of a lowercase word: irregular and regular verb inflections first,
/// then regular noun plurals, else the word itself.
pub fn lemmatize(word: &str) -> String {
    if is_closed_class(word) {
        return word.to_string();
    }
    verb_lemma(word).unwrap_or_else(|| noun_lemma(word))
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WordClass {
    Fixed(Pos),
    Dual,
    Demonstrative,
    NumberWord,
}

fn is_closed_class(word: &str) -> bool {
    DETERMINERS.contains(word)
        || DEMONSTRATIVES.contains(word)
        || PREPOSITIONS.contains(word)
        || CONJUNCTIONS.contains(word)
        || ADVERBS.contains(word)
        || PRONOUNS.contains(word)
        || ADJECTIVES.contains(word)
        || NUMBER_WORDS.contains(word)
}

fn classify(kind: LexemeKind, word: &str) -> WordClass {
    match kind {
        LexemeKind::Number => return WordClass::Fixed(Pos::Num),
        LexemeKind::Punct => return WordClass::Fixed(Pos::Punct),
        LexemeKind::Word => {}
    }

    if DETERMINERS.contains(word) {
        WordClass::Fixed(Pos::Det)
    } else if DEMONSTRATIVES.contains(word) {
        WordClass::Demonstrative
    } else if PREPOSITIONS.contains(word) {
        WordClass::Fixed(Pos::Adp)
    } else if CONJUNCTIONS.contains(word) {
        WordClass::Fixed(Pos::Cconj)
    } else if ADVERBS.contains(word) {
        WordClass::Fixed(Pos::Adv)
    } else if PRONOUNS.contains(word) {
        WordClass::Fixed(Pos::Pron)
    } else if ADJECTIVES.contains(word) {
        WordClass::Fixed(Pos::Adj)
    } else if NUMBER_WORDS.contains(word) {
        WordClass::NumberWord
    } else if word.chars().count() == 1 {
        // Single letters name variables.
        WordClass::Fixed(Pos::Propn)
    } else {
        match verb_lemma(word) {
            Some(lemma) if DUAL_WORDS.contains(lemma.as_str()) => WordClass::Dual,
            Some(_) => WordClass::Fixed(Pos::Verb),
            None => WordClass::Fixed(Pos::Noun),
        }
    }
}

fn resolve(
    word: &str,
    class: WordClass,
    prev: Option<(&str, WordClass)>,
    next: Option<(&str, WordClass)>,
) -> Pos {
    match class {
        WordClass::Fixed(pos) => pos,
        WordClass::Dual => {
            if opens_clause(prev, next) {
                Pos::Verb
            } else {
                Pos::Noun
            }
        }
        WordClass::Demonstrative => {
            if next.is_some_and(|(_, c)| introduces_nominal(c)) {
                Pos::Det
            } else {
                Pos::Pron
            }
        }
        WordClass::NumberWord => {
            let after_modifier = matches!(
                prev,
                Some((_, WordClass::Fixed(Pos::Adj | Pos::Det)))
            );
            let before_nominal = next.is_some_and(|(_, c)| introduces_nominal(c));
            if word == "one" && after_modifier && !before_nominal {
                Pos::Noun
            } else {
                Pos::Num
            }
        }
    }
}

/// Where an imperative clause can start.
fn opens_clause(prev: Option<(&str, WordClass)>, next: Option<(&str, WordClass)>) -> bool {
    match prev {
        None => next.map_or(true, |(w, _)| w != "of"),
        Some((w, _)) if CLAUSE_OPENERS.contains(&w) => true,
        Some((_, WordClass::Fixed(Pos::Adv))) => true,
        Some((_, WordClass::Fixed(Pos::Cconj))) => matches!(
            next,
            Some((
                _,
                WordClass::Fixed(Pos::Pron | Pos::Det) | WordClass::Demonstrative
            ))
        ),
        Some(_) => false,
    }
}

fn introduces_nominal(class: WordClass) -> bool {
    matches!(
        class,
        WordClass::Fixed(Pos::Noun | Pos::Propn | Pos::Num | Pos::Adj)
            | WordClass::Dual
            | WordClass::NumberWord
    )
}

// ============================================================================
// LEMMATIZATION
// ============================================================================

fn lemma_for(kind: LexemeKind, word: &str, pos: Pos) -> String {
    match (kind, pos) {
        (LexemeKind::Word, Pos::Verb | Pos::Noun) => lemmatize(word),
        _ => word.to_string(),
    }
}

/// Try inflection rules, accepting a candidate only if it is a known verb.
fn verb_lemma(word: &str) -> Option<String> {
    if let Some(base) = IRREGULAR_VERBS.get(word) {
        return Some((*base).to_string());
    }
    if is_verb(word) {
        return Some(word.to_string());
    }

    let mut candidates: Vec<String> = Vec::new();
    if let Some(stem) = word.strip_suffix("ies").or_else(|| word.strip_suffix("ied")) {
        candidates.push(format!("{stem}y"));
    }
    for suffix in ["ing", "ed"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            candidates.push(stem.to_string());
            candidates.push(format!("{stem}e"));
            if let Some(single) = undouble(stem) {
                candidates.push(single.to_string());
            }
        }
    }
    if let Some(stem) = word.strip_suffix("es") {
        candidates.push(stem.to_string());
    }
    if let Some(stem) = word.strip_suffix('s') {
        candidates.push(stem.to_string());
    }

    candidates.into_iter().find(|c| is_verb(c))
}

/// "stopp" -> "stop"
fn undouble(stem: &str) -> Option<&str> {
    let mut chars = stem.chars().rev();
    let (last, before) = (chars.next()?, chars.next()?);
    if last == before && !"aeiou".contains(last) {
        Some(&stem[..stem.len() - last.len_utf8()])
    } else {
        None
    }
}

fn noun_lemma(word: &str) -> String {
    if word.chars().count() <= 3 {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{stem}y");
    }
    for suffix in ["ches", "shes", "sses", "xes", "zes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with('s') && !["ss", "us", "is"].iter().any(|s| word.ends_with(s)) {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::lexer::lex;

    fn tags(text: &str) -> Vec<(String, Pos)> {
        let lexemes = lex(text).unwrap();
        tag(&lexemes)
            .into_iter()
            .zip(&lexemes)
            .map(|(t, l)| (l.text.to_string(), t.pos))
            .collect()
    }

    fn pos_of(text: &str, word: &str) -> Pos {
        tags(text)
            .into_iter()
            .find(|(w, _)| w == word)
            .map(|(_, p)| p)
            .unwrap()
    }

    #[test]
    fn lemmatizes_verb_inflections() {
        assert_eq!(lemmatize("subtracted"), "subtract");
        assert_eq!(lemmatize("adding"), "add");
        assert_eq!(lemmatize("multiplies"), "multiply");
        assert_eq!(lemmatize("multiplied"), "multiply");
        assert_eq!(lemmatize("divided"), "divide");
        assert_eq!(lemmatize("dividing"), "divide");
        assert_eq!(lemmatize("doubled"), "double");
        assert_eq!(lemmatize("took"), "take");
    }

    #[test]
    fn lemmatizes_noun_plurals() {
        assert_eq!(lemmatize("products"), "product");
        assert_eq!(lemmatize("sums"), "sum");
        assert_eq!(lemmatize("quantities"), "quantity");
        assert_eq!(lemmatize("boxes"), "box");
        assert_eq!(lemmatize("process"), "process");
        assert_eq!(lemmatize("its"), "its");
    }

    #[test]
    fn dual_words_are_verbs_only_at_clause_start() {
        assert_eq!(pos_of("sum the numbers", "sum"), Pos::Verb);
        assert_eq!(pos_of("add the sum of 3 and 4", "sum"), Pos::Noun);
        assert_eq!(pos_of("add 3 and then square it", "square"), Pos::Verb);
        assert_eq!(pos_of("sum of 3 and 4", "sum"), Pos::Noun);
    }

    #[test]
    fn pronominal_one_is_a_noun() {
        assert_eq!(pos_of("subtract the first one", "one"), Pos::Noun);
        assert_eq!(pos_of("add one and two", "one"), Pos::Num);
    }

    #[test]
    fn demonstratives_depend_on_what_follows() {
        assert_eq!(pos_of("divide that number by 2", "that"), Pos::Det);
        assert_eq!(pos_of("divide that by 2", "that"), Pos::Pron);
    }

    #[test]
    fn letters_are_variables_and_digits_are_numbers() {
        let t = tags("set x to 3");
        assert_eq!(t[1].1, Pos::Propn);
        assert_eq!(t[3].1, Pos::Num);
        assert_eq!(pos_of("set x to 3", "set"), Pos::Verb);
    }

    #[test]
    fn like_num_covers_digits_and_number_words() {
        let lexemes = lex("add seven and 12 to x").unwrap();
        let flags: Vec<bool> = tag(&lexemes).into_iter().map(|t| t.like_num).collect();
        assert_eq!(flags, vec![false, true, false, true, false, false]);
    }
}
