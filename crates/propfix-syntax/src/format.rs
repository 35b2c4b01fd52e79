//! Elastic trivia formatting.
//!
//! Edits leave zero-width `Elastic` markers where nodes were removed. This
//! pass visits only the tokens carrying a marker, drops the marker, and tidies
//! the blank lines around it: none directly after `{` or before `}`, and at
//! most one anywhere else. Tokens without markers are left byte-for-byte.

use crate::green::{GreenElement, GreenNode, GreenToken, Trivia, TriviaKind};
use crate::kind::SyntaxKind;
use crate::tree::SyntaxTree;
use std::sync::Arc;
use tracing::trace;

pub fn collapse_elastic(tree: &SyntaxTree) -> SyntaxTree {
    let mut state = Collapse {
        previous: None,
        changed: 0,
    };
    let root = state.visit(tree.green_root());
    trace!(tokens = state.changed, "collapsed elastic trivia");
    SyntaxTree::new(root)
}

struct Collapse {
    previous: Option<Arc<GreenToken>>,
    changed: usize,
}

impl Collapse {
    fn visit(&mut self, node: &Arc<GreenNode>) -> Arc<GreenNode> {
        let mut touched = false;
        let children: Vec<GreenElement> = node
            .children()
            .iter()
            .map(|child| match child {
                GreenElement::Node(inner) => {
                    let rebuilt = self.visit(inner);
                    touched |= !Arc::ptr_eq(&rebuilt, inner);
                    GreenElement::Node(rebuilt)
                }
                GreenElement::Token(token) => {
                    let rebuilt = self.visit_token(token);
                    touched |= !Arc::ptr_eq(&rebuilt, token);
                    GreenElement::Token(rebuilt)
                }
            })
            .collect();
        if touched {
            Arc::new(GreenNode::new(node.kind(), children))
        } else {
            Arc::clone(node)
        }
    }

    fn visit_token(&mut self, token: &Arc<GreenToken>) -> Arc<GreenToken> {
        let has_marker = token
            .leading()
            .iter()
            .chain(token.trailing())
            .any(Trivia::is_elastic);
        let result = if has_marker {
            self.changed += 1;
            let at_line_start = self.previous.as_ref().is_none_or(|prev| {
                prev.trailing().last().is_some_and(Trivia::is_end_of_line)
            });
            let after_open_brace = self
                .previous
                .as_ref()
                .is_some_and(|prev| prev.kind() == SyntaxKind::OpenBraceToken);
            let suppress = after_open_brace || token.kind() == SyntaxKind::CloseBraceToken;
            let leading = collapse_leading(token.leading(), at_line_start, suppress);
            let trailing = token
                .trailing()
                .iter()
                .filter(|t| !t.is_elastic())
                .cloned()
                .collect();
            Arc::new(
                GreenToken::clone(token)
                    .with_leading(leading)
                    .with_trailing(trailing),
            )
        } else {
            Arc::clone(token)
        };
        // Missing tokens have no text and do not break a line.
        if !result.is_missing() {
            self.previous = Some(Arc::clone(&result));
        }
        result
    }
}

/// Rewrite leading trivia without elastic markers, limiting blank lines.
///
/// `at_line_start` says whether the previous token's trailing trivia ended the
/// line, in which case the first line break seen here closes a blank line.
fn collapse_leading(leading: &[Trivia], mut at_line_start: bool, suppress: bool) -> Vec<Trivia> {
    let mut out = Vec::with_capacity(leading.len());
    // whitespace on the current line, emitted only if the line is not dropped
    let mut line: Vec<Trivia> = Vec::new();
    let mut blank_lines = 0usize;

    for trivia in leading.iter().filter(|t| !t.is_elastic()) {
        match trivia.kind {
            TriviaKind::Whitespace => line.push(trivia.clone()),
            TriviaKind::EndOfLine => {
                if at_line_start {
                    blank_lines += 1;
                    if suppress || blank_lines > 1 {
                        line.clear();
                        continue;
                    }
                }
                out.append(&mut line);
                out.push(trivia.clone());
                at_line_start = true;
            }
            TriviaKind::Directive(_) => {
                out.append(&mut line);
                out.push(trivia.clone());
                at_line_start = true;
                blank_lines = 0;
            }
            TriviaKind::SingleLineComment | TriviaKind::MultiLineComment | TriviaKind::Elastic => {
                out.append(&mut line);
                out.push(trivia.clone());
                at_line_start = false;
                blank_lines = 0;
            }
        }
    }
    out.append(&mut line);
    out
}
