//! Operation extraction - recovers nested operations from a dependency tree.
//!
//! The outer scan walks tokens left to right. Every operation word not already
//! consumed by an earlier walk becomes a local root: its nested operations are
//! emitted as one cluster, then the root itself as a cluster of one. Clusters
//! therefore come out innermost first.
//!
//! Two walks cooperate:
//! - the root traversal finds nested operation words and leftover nouns;
//! - the operand collector gathers the flat noun chain of one nested operation.
//!
//! An operand slot is either a noun chain or a nested operation, never both:
//! the collector stops at operation words and the traversal picks them up.

use std::collections::HashSet;

use log::{debug, trace};

use crate::normalize::DigitMap;
use crate::resources::Resources;
use crate::syntax::{Dep, Pos, Sentence, Token};

pub mod record;

pub use record::{Cluster, Extraction, OperationRecord};

/// Relations the top-level root may follow.
const ROOT_RELATIONS: &[Dep] = &[Dep::Dobj, Dep::Prep];

/// Relations followed everywhere below the root.
const INNER_RELATIONS: &[Dep] = &[Dep::Conj, Dep::Dobj, Dep::Prep, Dep::Pobj];

/// Extracts operation clusters from one parsed, placeholder-substituted sentence.
pub struct Extractor<'a> {
    sentence: &'a Sentence,
    resources: &'a Resources,
    digits: &'a DigitMap,
}

/// Accumulators for one local root.
#[derive(Debug, Default)]
struct RootScan {
    dependencies: Vec<OperationRecord>,
    nouns: Vec<usize>,
    covered: HashSet<usize>,
}

impl<'a> Extractor<'a> {
    pub fn new(sentence: &'a Sentence, resources: &'a Resources, digits: &'a DigitMap) -> Self {
        Self {
            sentence,
            resources,
            digits,
        }
    }

    /// Run the outer scan.
    pub fn extract(&self) -> Extraction {
        let mut visited = HashSet::new();
        let mut clusters = Vec::new();

        for token in self.sentence.tokens() {
            if !self.is_operation(token) || visited.contains(&token.index) {
                continue;
            }

            let mut scan = RootScan::default();
            self.traverse(token, true, &mut visited, &mut scan);

            if !scan.dependencies.is_empty() {
                clusters.push(Cluster::new(scan.dependencies));
            }

            let operands = scan
                .nouns
                .iter()
                .filter(|i| !scan.covered.contains(i))
                .filter_map(|&i| self.sentence.get(i))
                .map(|t| self.resolve(t))
                .collect();
            let record = OperationRecord::new(token.text.clone(), operands);
            debug!("operation at {}: {}", token.index, record);
            clusters.push(Cluster::new(vec![record]));
        }

        Extraction::new(clusters)
    }

    /// Walk below `token`, recording nested operations and candidate nouns.
    fn traverse(
        &self,
        token: &Token,
        is_root: bool,
        visited: &mut HashSet<usize>,
        scan: &mut RootScan,
    ) {
        visited.insert(token.index);
        let relations = if is_root {
            ROOT_RELATIONS
        } else {
            INNER_RELATIONS
        };

        for child in self.sentence.children(token) {
            if !relations.contains(&child.dep) {
                continue;
            }

            if self.is_operation(child) {
                let mut operands = Vec::new();
                self.collect_operands(child, &mut operands, &mut scan.covered);
                trace!("nested {} under {}: {:?}", child.text, token.text, operands);
                scan.dependencies
                    .push(OperationRecord::new(child.text.clone(), operands));
                scan.covered.insert(child.index);
            } else if matches!(child.pos, Pos::Noun | Pos::Num) {
                scan.nouns.push(child.index);
            }

            self.traverse(child, false, visited, scan);
        }
    }

    /// Gather the noun chain hanging off a nested operation word.
    fn collect_operands(
        &self,
        token: &Token,
        operands: &mut Vec<String>,
        covered: &mut HashSet<usize>,
    ) {
        for child in self.sentence.children(token) {
            if !INNER_RELATIONS.contains(&child.dep) || self.is_operation(child) {
                continue;
            }
            if child.pos == Pos::Noun {
                operands.push(self.resolve(child));
                covered.insert(child.index);
            }
            self.collect_operands(child, operands, covered);
        }
    }

    fn is_operation(&self, token: &Token) -> bool {
        self.resources.is_operation(&token.text)
    }

    /// The original digit if the token is a placeholder, else its text.
    fn resolve(&self, token: &Token) -> String {
        self.digits
            .get(token.index)
            .map_or_else(|| token.text.clone(), str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{SentenceBuilder, Span, TokenDraft};

    /// (text, pos, dep, head)
    fn sentence(rows: &[(&str, Pos, Dep, Option<usize>)]) -> Sentence {
        let text = rows.iter().map(|s| s.0).collect::<Vec<_>>().join(" ");
        let mut b = SentenceBuilder::new(text);
        for &(word, pos, dep, head) in rows {
            b.push(TokenDraft {
                text: word.into(),
                lemma: word.into(),
                pos,
                dep,
                head,
                like_num: false,
                span: Span::default(),
            });
        }
        b.build().unwrap()
    }

    fn render(extraction: &Extraction) -> String {
        serde_json::to_string(extraction).unwrap()
    }

    #[test]
    fn nested_operations_come_before_their_root() {
        // "add the sum of number and number"
        let s = sentence(&[
            ("add", Pos::Verb, Dep::Root, None),
            ("the", Pos::Det, Dep::Det, Some(2)),
            ("sum", Pos::Noun, Dep::Dobj, Some(0)),
            ("of", Pos::Adp, Dep::Prep, Some(2)),
            ("number", Pos::Noun, Dep::Pobj, Some(3)),
            ("and", Pos::Cconj, Dep::Cc, Some(4)),
            ("number", Pos::Noun, Dep::Conj, Some(4)),
        ]);
        let digits = DigitMap::default();
        let resources = Resources::default();
        let out = Extractor::new(&s, &resources, &digits).extract();
        assert_eq!(
            render(&out),
            r#"[[{"sum":["number","number"]}],[{"add":[]}]]"#
        );
    }

    #[test]
    fn root_ignores_conjunct_clauses() {
        // "add 7 and then divide it by 2" with "divide" as a conjunct of "add"
        let s = sentence(&[
            ("add", Pos::Verb, Dep::Root, None),
            ("7", Pos::Num, Dep::Dobj, Some(0)),
            ("and", Pos::Cconj, Dep::Cc, Some(4)),
            ("then", Pos::Adv, Dep::Advmod, Some(4)),
            ("divide", Pos::Verb, Dep::Conj, Some(0)),
            ("it", Pos::Pron, Dep::Dobj, Some(4)),
            ("by", Pos::Adp, Dep::Prep, Some(4)),
            ("2", Pos::Num, Dep::Pobj, Some(6)),
        ]);
        let digits = DigitMap::default();
        let resources = Resources::default();
        let out = Extractor::new(&s, &resources, &digits).extract();
        assert_eq!(render(&out), r#"[[{"add":["7"]}],[{"divide":["2"]}]]"#);
    }

    #[test]
    fn collector_skips_numbers_and_nested_operations() {
        // "multiply the product of 12 and sum"
        let s = sentence(&[
            ("multiply", Pos::Verb, Dep::Root, None),
            ("product", Pos::Noun, Dep::Dobj, Some(0)),
            ("of", Pos::Adp, Dep::Prep, Some(1)),
            ("12", Pos::Num, Dep::Pobj, Some(2)),
            ("and", Pos::Cconj, Dep::Cc, Some(3)),
            ("sum", Pos::Noun, Dep::Conj, Some(3)),
        ]);
        let digits = DigitMap::default();
        let resources = Resources::default();
        let out = Extractor::new(&s, &resources, &digits).extract();
        assert_eq!(
            render(&out),
            r#"[[{"product":[]},{"sum":[]}],[{"multiply":["12"]}]]"#
        );
    }

    #[test]
    fn no_operation_words_means_no_clusters() {
        let s = sentence(&[
            ("hello", Pos::Noun, Dep::Root, None),
            ("world", Pos::Noun, Dep::Dobj, Some(0)),
        ]);
        let digits = DigitMap::default();
        let resources = Resources::default();
        assert!(Extractor::new(&s, &resources, &digits).extract().is_empty());
    }
}
