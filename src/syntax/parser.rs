//! textmath Parser - Rule-Based Dependency Builder
//!
//! Turns an imperative arithmetic sentence into a dependency tree with
//! conventional relation labels. The grammar it recognizes is small:
//!
//! ```text
//! sentence := clause (connector* VERB args)*
//! clause   := connector* VERB args | noun_list args
//! args     := noun_list? (prep noun_list | connector | noun_list)*
//! noun     := PRON | (DET | ADJ)* nominal+ ("of" noun_list)*
//! ```
//!
//! The first clause head is the root; every later clause verb hangs off it as
//! `conj`. Anything the grammar does not expect is attached as `dep` so the
//! output is always a single tree.

use crate::errors::TextMathError;
use crate::syntax::lexer::lex;
use crate::syntax::lexicon::{self, Tagged};
use crate::syntax::{Dep, DependencyParser, Pos, Sentence, SentenceBuilder, TokenDraft};

/// Deterministic parser for the imperative arithmetic register.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleParser;

impl RuleParser {
    pub fn new() -> Self {
        Self
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

impl DependencyParser for RuleParser {
    fn parse(&self, text: &str) -> Result<Sentence, TextMathError> {
        let lexemes = lex(text)?;
        let tagged = lexicon::tag(&lexemes);
        let words: Vec<String> = lexemes.iter().map(|l| l.text.to_lowercase()).collect();
        let arcs = TreeBuilder::new(&words, &tagged).build();

        let mut builder = SentenceBuilder::new(text);
        for ((lexeme, tag), (head, dep)) in lexemes.iter().zip(tagged).zip(arcs) {
            builder.push(TokenDraft {
                text: lexeme.text.to_string(),
                lemma: tag.lemma,
                pos: tag.pos,
                dep,
                head,
                like_num: tag.like_num,
                span: lexeme.span,
            });
        }
        builder.build()
    }
}

// ============================================================================
// TREE BUILDER
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct Clause {
    start: usize,
    verb: Option<usize>,
    end: usize,
}

struct TreeBuilder<'a> {
    words: &'a [String],
    tags: Vec<Pos>,
    arcs: Vec<(Option<usize>, Dep)>,
    cursor: usize,
    end: usize,
}

impl<'a> TreeBuilder<'a> {
    fn new(words: &'a [String], tagged: &[Tagged]) -> Self {
        Self {
            words,
            tags: tagged.iter().map(|t| t.pos).collect(),
            arcs: vec![(None, Dep::Unclassified); words.len()],
            cursor: 0,
            end: 0,
        }
    }

    fn build(mut self) -> Vec<(Option<usize>, Dep)> {
        let mut root = None;

        for clause in self.segment() {
            if clause.start >= clause.end {
                continue;
            }
            self.cursor = clause.start;
            self.end = clause.end;

            let (head, connectors) = match clause.verb {
                Some(verb) => {
                    self.cursor = verb + 1;
                    (verb, (clause.start..verb).collect::<Vec<_>>())
                }
                None => self.verbless_head(),
            };

            match root {
                None => {
                    root = Some(head);
                    self.arcs[head] = (None, Dep::Root);
                }
                Some(r) => self.link(head, r, Dep::Conj),
            }
            for c in connectors {
                let dep = connector_dep(self.tags[c]);
                self.link(c, head, dep);
            }

            self.arguments(head, clause.verb.is_some());
        }

        self.arcs
    }

    /// Split at every verb; the run of connectors before a verb opens its clause.
    fn segment(&self) -> Vec<Clause> {
        let n = self.tags.len();
        let mut clauses = Vec::new();
        let mut open = Clause {
            start: 0,
            verb: None,
            end: n,
        };

        for i in 0..n {
            if self.tags[i] != Pos::Verb {
                continue;
            }
            let mut start = i;
            while start > open.start && is_connector(self.tags[start - 1]) {
                start -= 1;
            }
            if open.verb.is_none() && start == open.start {
                open.verb = Some(i);
            } else {
                open.end = start;
                clauses.push(open);
                open = Clause {
                    start,
                    verb: Some(i),
                    end: n,
                };
            }
        }
        clauses.push(open);
        clauses
    }

    /// Head of a clause with no verb: its first noun phrase, else its first token.
    fn verbless_head(&mut self) -> (usize, Vec<usize>) {
        let mut pending = Vec::new();
        while self.cursor < self.end && !self.tags[self.cursor].starts_nominal() {
            pending.push(self.cursor);
            self.cursor += 1;
        }
        match self.noun_phrase_list() {
            Some(head) => (head, pending),
            None => {
                let head = pending.first().copied().unwrap_or(self.cursor);
                (head, pending.into_iter().skip(1).collect())
            }
        }
    }

    fn arguments(&mut self, head: usize, has_verb: bool) {
        let mut has_object = false;
        if has_verb && self.at_nominal() {
            if let Some(object) = self.noun_phrase_list() {
                self.link(object, head, Dep::Dobj);
                has_object = true;
            }
        }

        while self.cursor < self.end {
            let i = self.cursor;
            let tag = self.tags[i];
            match tag {
                Pos::Adp => {
                    self.cursor += 1;
                    self.link(i, head, Dep::Prep);
                    self.prepositional_object(i);
                }
                Pos::Cconj | Pos::Adv | Pos::Punct => {
                    self.cursor += 1;
                    self.link(i, head, connector_dep(tag));
                }
                _ if tag.starts_nominal() => match self.noun_phrase_list() {
                    Some(phrase) => {
                        let dep = if has_verb && !has_object {
                            has_object = true;
                            Dep::Dobj
                        } else {
                            Dep::Unclassified
                        };
                        self.link(phrase, head, dep);
                    }
                    None => {
                        self.cursor += 1;
                        self.link(i, head, Dep::Unclassified);
                    }
                },
                _ => {
                    self.cursor += 1;
                    self.link(i, head, Dep::Unclassified);
                }
            }
            if self.cursor == i {
                self.cursor += 1;
                self.link(i, head, Dep::Unclassified);
            }
        }
    }

    fn prepositional_object(&mut self, prep: usize) {
        if self.at_nominal() {
            if let Some(object) = self.noun_phrase_list() {
                self.link(object, prep, Dep::Pobj);
            }
        }
    }

    /// `noun (("and" | "or" | ",") noun)*`, each conjunct hanging off the previous one.
    fn noun_phrase_list(&mut self) -> Option<usize> {
        let first = self.noun_phrase()?;
        let mut prev = first;

        while self.cursor + 1 < self.end {
            let joiner = self.cursor;
            let joins = self.tags[joiner] == Pos::Cconj || self.words[joiner] == ",";
            if !joins || !self.tags[joiner + 1].starts_nominal() {
                break;
            }
            self.cursor += 1;
            let Some(conjunct) = self.noun_phrase() else {
                self.cursor = joiner;
                break;
            };
            let dep = connector_dep(self.tags[joiner]);
            self.link(joiner, prev, dep);
            self.link(conjunct, prev, Dep::Conj);
            prev = conjunct;
        }

        Some(first)
    }

    fn noun_phrase(&mut self) -> Option<usize> {
        if !self.at_nominal() {
            return None;
        }
        let start = self.cursor;
        if self.tags[start] == Pos::Pron {
            self.cursor += 1;
            return Some(start);
        }

        let mut modifiers = Vec::new();
        while self.cursor < self.end && matches!(self.tags[self.cursor], Pos::Det | Pos::Adj) {
            modifiers.push(self.cursor);
            self.cursor += 1;
        }

        let run_start = self.cursor;
        while self.cursor < self.end && self.tags[self.cursor].is_nominal() {
            self.cursor += 1;
        }

        let head = if self.cursor > run_start {
            let head = self.cursor - 1;
            for j in run_start..head {
                let dep = if self.tags[j] == Pos::Num {
                    Dep::Nummod
                } else {
                    Dep::Compound
                };
                self.link(j, head, dep);
            }
            head
        } else {
            // "the first and the second": the last modifier stands in for the noun.
            modifiers.pop()?
        };

        for m in modifiers {
            let dep = if self.tags[m] == Pos::Det {
                Dep::Det
            } else {
                Dep::Amod
            };
            self.link(m, head, dep);
        }

        while self.cursor < self.end && self.words[self.cursor] == "of" {
            let prep = self.cursor;
            self.cursor += 1;
            self.link(prep, head, Dep::Prep);
            self.prepositional_object(prep);
        }

        Some(head)
    }

    fn at_nominal(&self) -> bool {
        self.cursor < self.end && self.tags[self.cursor].starts_nominal()
    }

    fn link(&mut self, dependent: usize, head: usize, dep: Dep) {
        self.arcs[dependent] = (Some(head), dep);
    }
}

// ============================================================================
// UTILITIES
// ============================================================================

fn is_connector(tag: Pos) -> bool {
    matches!(tag, Pos::Cconj | Pos::Adv | Pos::Punct)
}

fn connector_dep(tag: Pos) -> Dep {
    match tag {
        Pos::Cconj => Dep::Cc,
        Pos::Adv => Dep::Advmod,
        Pos::Punct => Dep::Punct,
        _ => Dep::Unclassified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Sentence {
        RuleParser.parse(text).unwrap()
    }

    /// (text, relation, head text) for every token.
    fn arcs(sentence: &Sentence) -> Vec<(String, &'static str, String)> {
        sentence
            .tokens()
            .iter()
            .map(|t| {
                let head = sentence
                    .head_of(t)
                    .map(|h| h.text.clone())
                    .unwrap_or_default();
                (t.text.clone(), t.dep.as_str(), head)
            })
            .collect()
    }

    fn arc<'a>(
        all: &'a [(String, &'static str, String)],
        index: usize,
    ) -> (&'a str, &'static str, &'a str) {
        let (t, d, h) = &all[index];
        (t.as_str(), *d, h.as_str())
    }

    #[test]
    fn object_and_prepositional_chain() {
        let s = parse("subtract the product of 3 and 4 from the sum of 5 and 6");
        let a = arcs(&s);
        assert_eq!(arc(&a, 0), ("subtract", "ROOT", ""));
        assert_eq!(arc(&a, 1), ("the", "det", "product"));
        assert_eq!(arc(&a, 2), ("product", "dobj", "subtract"));
        assert_eq!(arc(&a, 3), ("of", "prep", "product"));
        assert_eq!(arc(&a, 4), ("3", "pobj", "of"));
        assert_eq!(arc(&a, 5), ("and", "cc", "3"));
        assert_eq!(arc(&a, 6), ("4", "conj", "3"));
        assert_eq!(arc(&a, 7), ("from", "prep", "subtract"));
        assert_eq!(arc(&a, 9), ("sum", "pobj", "from"));
        assert_eq!(arc(&a, 13), ("6", "conj", "5"));
    }

    #[test]
    fn later_clauses_are_conjuncts_of_the_root() {
        let s = parse("take the product of 3 and 4 and add them and then subtract it from 9");
        let root = s.root().unwrap();
        assert_eq!(root.text, "take");
        let conjuncts: Vec<&str> = s
            .children(root)
            .filter(|c| c.dep == Dep::Conj)
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(conjuncts, vec!["add", "subtract"]);

        let a = arcs(&s);
        assert_eq!(arc(&a, 7), ("and", "cc", "add"));
        assert_eq!(arc(&a, 9), ("them", "dobj", "add"));
        assert_eq!(arc(&a, 11), ("then", "advmod", "subtract"));
    }

    #[test]
    fn coordinated_phrases_chain_through_conj() {
        let s = parse("add the product of 3 and 4 and the product of 5 and 6");
        let a = arcs(&s);
        assert_eq!(arc(&a, 9), ("product", "conj", "4"));
        assert_eq!(arc(&a, 10), ("of", "prep", "product"));
    }

    #[test]
    fn modifiers_attach_to_the_noun() {
        let s = parse("subtract the first digit by the second digit");
        let a = arcs(&s);
        assert_eq!(arc(&a, 2), ("first", "amod", "digit"));
        assert_eq!(arc(&a, 3), ("digit", "dobj", "subtract"));
        assert_eq!(arc(&a, 4), ("by", "prep", "subtract"));
        assert_eq!(arc(&a, 7), ("digit", "pobj", "by"));
    }

    #[test]
    fn verbless_sentence_roots_at_its_noun() {
        let s = parse("the sum of 3 and 4");
        assert_eq!(s.root().unwrap().text, "sum");
    }

    #[test]
    fn every_token_is_attached() {
        for text in [
            "then , add ; 3 3 of of",
            "and",
            "3 plus 4 equals what ?",
            "multiply x to the sum of 3 and 4 by the sum of 5 and 6",
        ] {
            let s = parse(text);
            let roots = s.tokens().iter().filter(|t| t.head.is_none()).count();
            assert_eq!(roots, 1, "{text}");
        }
    }

    #[test]
    fn lemmas_and_tags_are_carried() {
        let s = parse("subtracted 3 from x");
        let first = s.get(0).unwrap();
        assert_eq!(first.lemma, "subtract");
        assert_eq!(first.pos, Pos::Verb);
        assert!(s.get(1).unwrap().like_num);
        assert_eq!(s.get(3).unwrap().pos, Pos::Propn);
    }
}
