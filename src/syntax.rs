//! Syntax module for textmath
//!
//! This module provides the annotated dependency tree the extractor walks, and the
//! `DependencyParser` seam through which any tagger/parser can supply one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorReporting, ReportContext, SourceContext, TextMathError};

pub mod lexer;
pub mod lexicon;
pub mod parser;

pub use parser::RuleParser;

/// Represents a span in the source text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Coarse part-of-speech tag.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pos {
    #[serde(rename = "NOUN")]
    Noun,
    #[serde(rename = "PROPN")]
    Propn,
    #[serde(rename = "NUM")]
    Num,
    #[serde(rename = "VERB")]
    Verb,
    #[serde(rename = "PRON")]
    Pron,
    #[serde(rename = "DET")]
    Det,
    #[serde(rename = "ADP")]
    Adp,
    #[serde(rename = "CCONJ")]
    Cconj,
    #[serde(rename = "ADV")]
    Adv,
    #[serde(rename = "ADJ")]
    Adj,
    #[serde(rename = "PUNCT")]
    Punct,
    #[serde(rename = "X")]
    Other,
}

impl Pos {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Pos::Noun => "NOUN",
            Pos::Propn => "PROPN",
            Pos::Num => "NUM",
            Pos::Verb => "VERB",
            Pos::Pron => "PRON",
            Pos::Det => "DET",
            Pos::Adp => "ADP",
            Pos::Cconj => "CCONJ",
            Pos::Adv => "ADV",
            Pos::Adj => "ADJ",
            Pos::Punct => "PUNCT",
            Pos::Other => "X",
        }
    }

    /// Tags that can open a noun phrase.
    pub fn starts_nominal(&self) -> bool {
        matches!(
            self,
            Pos::Det | Pos::Adj | Pos::Noun | Pos::Propn | Pos::Num | Pos::Pron
        )
    }

    /// Tags that can head a noun phrase.
    pub fn is_nominal(&self) -> bool {
        matches!(self, Pos::Noun | Pos::Propn | Pos::Num)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Grammatical relation of a token to its head.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dep {
    #[serde(rename = "ROOT")]
    Root,
    #[serde(rename = "dobj")]
    Dobj,
    #[serde(rename = "prep")]
    Prep,
    #[serde(rename = "pobj")]
    Pobj,
    #[serde(rename = "conj")]
    Conj,
    #[serde(rename = "cc")]
    Cc,
    #[serde(rename = "det")]
    Det,
    #[serde(rename = "amod")]
    Amod,
    #[serde(rename = "nummod")]
    Nummod,
    #[serde(rename = "compound")]
    Compound,
    #[serde(rename = "advmod")]
    Advmod,
    #[serde(rename = "punct")]
    Punct,
    #[serde(rename = "dep")]
    Unclassified,
}

impl Dep {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Dep::Root => "ROOT",
            Dep::Dobj => "dobj",
            Dep::Prep => "prep",
            Dep::Pobj => "pobj",
            Dep::Conj => "conj",
            Dep::Cc => "cc",
            Dep::Det => "det",
            Dep::Amod => "amod",
            Dep::Nummod => "nummod",
            Dep::Compound => "compound",
            Dep::Advmod => "advmod",
            Dep::Punct => "punct",
            Dep::Unclassified => "dep",
        }
    }
}

impl fmt::Display for Dep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One annotated token of a parsed sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub index: usize,
    pub text: String,
    pub lemma: String,
    pub pos: Pos,
    pub dep: Dep,
    /// Position of the head token; `None` for the root.
    pub head: Option<usize>,
    /// Positions of dependents, ascending.
    pub children: Vec<usize>,
    pub like_num: bool,
    pub span: Span,
}

/// A dependency-annotated sentence. Tokens are stored by position and refer to
/// each other by index, so the tree is borrowed read-only by every walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    text: String,
    tokens: Vec<Token>,
}

impl Sentence {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// The token whose relation is `ROOT`.
    pub fn root(&self) -> Option<&Token> {
        self.tokens.iter().find(|t| t.dep == Dep::Root)
    }

    pub fn head_of(&self, token: &Token) -> Option<&Token> {
        token.head.and_then(|h| self.tokens.get(h))
    }

    /// Dependents of `token`, in sentence order.
    pub fn children<'a>(&'a self, token: &'a Token) -> impl Iterator<Item = &'a Token> + 'a {
        token.children.iter().filter_map(move |&c| self.tokens.get(c))
    }

    /// Surface words in order.
    pub fn words(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

/// Draft of one token before the tree is linked.
#[derive(Debug, Clone)]
pub struct TokenDraft {
    pub text: String,
    pub lemma: String,
    pub pos: Pos,
    pub dep: Dep,
    pub head: Option<usize>,
    pub like_num: bool,
    pub span: Span,
}

/// Assembles a `Sentence` from per-token drafts, computing children and
/// rejecting anything that is not a single-rooted tree.
#[derive(Debug, Default)]
pub struct SentenceBuilder {
    text: String,
    drafts: Vec<TokenDraft>,
}

impl SentenceBuilder {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            drafts: Vec::new(),
        }
    }

    pub fn push(&mut self, draft: TokenDraft) -> usize {
        self.drafts.push(draft);
        self.drafts.len() - 1
    }

    pub fn build(self) -> Result<Sentence, TextMathError> {
        let context = ReportContext::new(SourceContext::from_input(self.text.clone()), "tree");
        let len = self.drafts.len();

        let mut roots = 0;
        for (i, draft) in self.drafts.iter().enumerate() {
            match draft.head {
                None => roots += 1,
                Some(h) if h >= len => {
                    return Err(context.malformed_tree(&format!(
                        "token {} points at missing head {}",
                        i, h
                    )))
                }
                Some(h) if h == i => {
                    return Err(context.malformed_tree(&format!("token {} heads itself", i)))
                }
                Some(_) => {}
            }
        }
        if len > 0 && roots != 1 {
            return Err(context.malformed_tree(&format!("expected one root, found {}", roots)));
        }

        // Every head chain must reach the root within `len` steps.
        for start in 0..len {
            let mut cursor = self.drafts[start].head;
            let mut steps = 0;
            while let Some(h) = cursor {
                steps += 1;
                if steps > len {
                    return Err(context
                        .malformed_tree(&format!("cycle through token {}", start)));
                }
                cursor = self.drafts[h].head;
            }
        }

        let mut children = vec![Vec::new(); len];
        for (i, draft) in self.drafts.iter().enumerate() {
            if let Some(h) = draft.head {
                children[h].push(i);
            }
        }

        let tokens = self
            .drafts
            .into_iter()
            .zip(children)
            .enumerate()
            .map(|(index, (draft, children))| Token {
                index,
                text: draft.text,
                lemma: draft.lemma,
                pos: draft.pos,
                dep: if draft.head.is_none() { Dep::Root } else { draft.dep },
                head: draft.head,
                children,
                like_num: draft.like_num,
                span: draft.span,
            })
            .collect();

        Ok(Sentence {
            text: self.text,
            tokens,
        })
    }
}

/// The parser collaborator: text in, annotated tree out.
///
/// Implementations must be deterministic and free of side effects; the
/// pipeline calls `parse` once per rewriting stage.
pub trait DependencyParser {
    fn parse(&self, text: &str) -> Result<Sentence, TextMathError>;
}

impl<P: DependencyParser + ?Sized> DependencyParser for &P {
    fn parse(&self, text: &str) -> Result<Sentence, TextMathError> {
        (**self).parse(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(text: &str, head: Option<usize>, dep: Dep) -> TokenDraft {
        TokenDraft {
            text: text.into(),
            lemma: text.into(),
            pos: Pos::Noun,
            dep,
            head,
            like_num: false,
            span: Span::default(),
        }
    }

    #[test]
    fn builder_links_children_in_order() {
        let mut b = SentenceBuilder::new("add 3 4");
        b.push(draft("add", None, Dep::Root));
        b.push(draft("3", Some(0), Dep::Dobj));
        b.push(draft("4", Some(1), Dep::Conj));
        let s = b.build().unwrap();
        assert_eq!(s.root().unwrap().text, "add");
        assert_eq!(s.get(0).unwrap().children, vec![1]);
        assert_eq!(s.head_of(s.get(2).unwrap()).unwrap().text, "3");
        assert_eq!(s.words(), vec!["add", "3", "4"]);
    }

    #[test]
    fn builder_rejects_cycles() {
        let mut b = SentenceBuilder::new("a b c");
        b.push(draft("a", None, Dep::Root));
        b.push(draft("b", Some(2), Dep::Dobj));
        b.push(draft("c", Some(1), Dep::Dobj));
        let err = b.build().unwrap_err();
        assert_eq!(err.kind.code_suffix(), "malformed_tree");
    }

    #[test]
    fn builder_rejects_two_roots() {
        let mut b = SentenceBuilder::new("a b");
        b.push(draft("a", None, Dep::Root));
        b.push(draft("b", None, Dep::Root));
        assert!(b.build().is_err());
    }

    #[test]
    fn builder_rejects_dangling_heads() {
        let mut b = SentenceBuilder::new("a");
        b.push(draft("a", Some(7), Dep::Dobj));
        assert!(b.build().is_err());
    }
}
