//! Green tree: immutable, position-independent syntax.
//!
//! Green nodes know their kind, children and total text length, nothing else.
//! They are shared through `Arc` between snapshots, so an edit only allocates
//! the spine from the root down to the changed nodes.

use crate::kind::SyntaxKind;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    If,
    Elif,
    Else,
    EndIf,
    Region,
    EndRegion,
    /// `#pragma`, `#define`, `#nullable` and friends.
    Other,
}

impl DirectiveKind {
    /// Classify directive text such as `#if DEBUG\n`.
    pub fn classify(text: &str) -> DirectiveKind {
        let body = text.trim_start().trim_start_matches('#').trim_start();
        let word: String = body
            .chars()
            .take_while(|ch| ch.is_ascii_alphabetic())
            .collect();
        match word.as_str() {
            "if" => DirectiveKind::If,
            "elif" => DirectiveKind::Elif,
            "else" => DirectiveKind::Else,
            "endif" => DirectiveKind::EndIf,
            "region" => DirectiveKind::Region,
            "endregion" => DirectiveKind::EndRegion,
            _ => DirectiveKind::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriviaKind {
    Whitespace,
    EndOfLine,
    SingleLineComment,
    MultiLineComment,
    /// A whole preprocessor line, including its line break.
    Directive(DirectiveKind),
    /// Zero-width marker left by edits for the formatter to consume.
    Elastic,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Trivia {
    pub kind: TriviaKind,
    pub text: Arc<str>,
}

impl Trivia {
    pub fn new(kind: TriviaKind, text: &str) -> Self {
        Trivia {
            kind,
            text: Arc::from(text),
        }
    }

    pub fn whitespace(text: &str) -> Self {
        Trivia::new(TriviaKind::Whitespace, text)
    }

    pub fn space() -> Self {
        Trivia::whitespace(" ")
    }

    pub fn end_of_line(text: &str) -> Self {
        Trivia::new(TriviaKind::EndOfLine, text)
    }

    pub fn elastic() -> Self {
        Trivia::new(TriviaKind::Elastic, "")
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.text.len() as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_directive(&self) -> bool {
        matches!(self.kind, TriviaKind::Directive(_))
    }

    pub fn is_end_of_line(&self) -> bool {
        self.kind == TriviaKind::EndOfLine
    }

    pub fn is_elastic(&self) -> bool {
        self.kind == TriviaKind::Elastic
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GreenToken {
    kind: SyntaxKind,
    text: Arc<str>,
    leading: Vec<Trivia>,
    trailing: Vec<Trivia>,
}

impl GreenToken {
    pub fn new(kind: SyntaxKind, text: &str) -> Self {
        GreenToken {
            kind,
            text: Arc::from(text),
            leading: Vec::new(),
            trailing: Vec::new(),
        }
    }

    /// A punctuation or keyword token with its fixed text.
    pub fn punct(kind: SyntaxKind) -> Self {
        GreenToken::new(kind, kind.text().unwrap_or(""))
    }

    /// A zero-width token the parser inserted for error recovery.
    pub fn missing(kind: SyntaxKind) -> Self {
        GreenToken::new(kind, "")
    }

    pub fn with_leading(mut self, leading: Vec<Trivia>) -> Self {
        self.leading = leading;
        self
    }

    pub fn with_trailing(mut self, trailing: Vec<Trivia>) -> Self {
        self.trailing = trailing;
        self
    }

    pub fn with_kind(mut self, kind: SyntaxKind) -> Self {
        self.kind = kind;
        self
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn leading(&self) -> &[Trivia] {
        &self.leading
    }

    #[inline]
    pub fn trailing(&self) -> &[Trivia] {
        &self.trailing
    }

    pub fn is_missing(&self) -> bool {
        self.text.is_empty() && self.kind != SyntaxKind::EndOfFileToken
    }

    pub fn leading_len(&self) -> u32 {
        self.leading.iter().map(Trivia::len).sum()
    }

    pub fn trailing_len(&self) -> u32 {
        self.trailing.iter().map(Trivia::len).sum()
    }

    pub fn full_len(&self) -> u32 {
        self.leading_len() + self.text.len() as u32 + self.trailing_len()
    }

    pub fn write_to(&self, out: &mut String) {
        for trivia in &self.leading {
            out.push_str(&trivia.text);
        }
        out.push_str(&self.text);
        for trivia in &self.trailing {
            out.push_str(&trivia.text);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GreenElement {
    Node(Arc<GreenNode>),
    Token(Arc<GreenToken>),
}

impl GreenElement {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            GreenElement::Node(node) => node.kind(),
            GreenElement::Token(token) => token.kind(),
        }
    }

    pub fn full_len(&self) -> u32 {
        match self {
            GreenElement::Node(node) => node.full_len(),
            GreenElement::Token(token) => token.full_len(),
        }
    }

    pub fn as_token(&self) -> Option<&Arc<GreenToken>> {
        match self {
            GreenElement::Token(token) => Some(token),
            GreenElement::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&Arc<GreenNode>> {
        match self {
            GreenElement::Node(node) => Some(node),
            GreenElement::Token(_) => None,
        }
    }
}

impl From<GreenToken> for GreenElement {
    fn from(token: GreenToken) -> Self {
        GreenElement::Token(Arc::new(token))
    }
}

impl From<GreenNode> for GreenElement {
    fn from(node: GreenNode) -> Self {
        GreenElement::Node(Arc::new(node))
    }
}

impl From<Arc<GreenNode>> for GreenElement {
    fn from(node: Arc<GreenNode>) -> Self {
        GreenElement::Node(node)
    }
}

impl From<Arc<GreenToken>> for GreenElement {
    fn from(token: Arc<GreenToken>) -> Self {
        GreenElement::Token(token)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GreenNode {
    kind: SyntaxKind,
    children: Vec<GreenElement>,
    full_len: u32,
}

impl GreenNode {
    pub fn new(kind: SyntaxKind, children: Vec<GreenElement>) -> Self {
        let full_len = children.iter().map(GreenElement::full_len).sum();
        GreenNode {
            kind,
            children,
            full_len,
        }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    #[inline]
    pub fn children(&self) -> &[GreenElement] {
        &self.children
    }

    #[inline]
    pub fn full_len(&self) -> u32 {
        self.full_len
    }

    pub fn first_token(&self) -> Option<&Arc<GreenToken>> {
        self.children.iter().find_map(|child| match child {
            GreenElement::Token(token) => Some(token),
            GreenElement::Node(node) => node.first_token(),
        })
    }

    pub fn last_token(&self) -> Option<&Arc<GreenToken>> {
        self.children.iter().rev().find_map(|child| match child {
            GreenElement::Token(token) => Some(token),
            GreenElement::Node(node) => node.last_token(),
        })
    }

    /// Rebuild the node with its first token transformed.
    pub fn map_first_token(&self, f: impl FnOnce(&GreenToken) -> GreenToken) -> GreenNode {
        let mut f = Some(f);
        self.map_edge_token(&mut f, false)
    }

    /// Rebuild the node with its last token transformed.
    pub fn map_last_token(&self, f: impl FnOnce(&GreenToken) -> GreenToken) -> GreenNode {
        let mut f = Some(f);
        self.map_edge_token(&mut f, true)
    }

    fn map_edge_token<F: FnOnce(&GreenToken) -> GreenToken>(
        &self,
        f: &mut Option<F>,
        from_end: bool,
    ) -> GreenNode {
        let mut children = self.children.clone();
        let indices: Vec<usize> = if from_end {
            (0..children.len()).rev().collect()
        } else {
            (0..children.len()).collect()
        };
        for i in indices {
            if f.is_none() {
                break;
            }
            let replacement = match &children[i] {
                GreenElement::Token(token) => f.take().map(|f| GreenElement::from(f(token))),
                GreenElement::Node(node) if node.first_token().is_some() => {
                    Some(GreenElement::from(node.map_edge_token(f, from_end)))
                }
                GreenElement::Node(_) => None,
            };
            if let Some(replacement) = replacement {
                children[i] = replacement;
            }
        }
        GreenNode::new(self.kind, children)
    }

    pub fn write_to(&self, out: &mut String) {
        for child in &self.children {
            match child {
                GreenElement::Node(node) => node.write_to(out),
                GreenElement::Token(token) => token.write_to(out),
            }
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.full_len as usize);
        self.write_to(&mut out);
        out
    }
}
