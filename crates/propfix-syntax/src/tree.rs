//! Red tree: an index arena over one green root, with absolute positions and
//! parent links.
//!
//! Every tree gets a fresh `TreeId` when it is built. `NodeId` and `TokenId`
//! carry that id, so a handle obtained from one snapshot cannot silently
//! address a node in another: lookups against the wrong tree return `None`.

use crate::green::{GreenElement, GreenNode, GreenToken, Trivia};
use crate::kind::SyntaxKind;
use crate::parser::ParseDiagnostic;
use propfix_common::TextSpan;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

/// Snapshot generation of a syntax tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeId(u64);

impl TreeId {
    fn fresh() -> Self {
        TreeId(NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tree#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub tree: TreeId,
    pub index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId {
    pub tree: TreeId,
    pub index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementRef {
    Node(u32),
    Token(u32),
}

#[derive(Debug)]
struct NodeData {
    kind: SyntaxKind,
    green: Arc<GreenNode>,
    parent: Option<u32>,
    children: Vec<ElementRef>,
    full_span: TextSpan,
    span: TextSpan,
}

#[derive(Debug)]
struct TokenData {
    green: Arc<GreenToken>,
    parent: u32,
    full_span: TextSpan,
    span: TextSpan,
}

#[derive(Debug)]
pub struct SyntaxTree {
    id: TreeId,
    root: Arc<GreenNode>,
    nodes: Vec<NodeData>,
    tokens: Vec<TokenData>,
    text: String,
    diagnostics: Vec<ParseDiagnostic>,
}

impl SyntaxTree {
    /// Build a tree over a green root. The root is node index 0.
    pub fn new(root: Arc<GreenNode>) -> SyntaxTree {
        SyntaxTree::with_diagnostics(root, Vec::new())
    }

    pub(crate) fn with_diagnostics(
        root: Arc<GreenNode>,
        diagnostics: Vec<ParseDiagnostic>,
    ) -> SyntaxTree {
        let mut tree = SyntaxTree {
            id: TreeId::fresh(),
            root: Arc::clone(&root),
            nodes: Vec::new(),
            tokens: Vec::new(),
            text: root.to_text(),
            diagnostics,
        };
        tree.build_node(&root, None, 0);
        tree
    }

    fn build_node(&mut self, green: &Arc<GreenNode>, parent: Option<u32>, offset: u32) -> u32 {
        let index = self.nodes.len() as u32;
        let full_span = TextSpan::at(offset, green.full_len());
        self.nodes.push(NodeData {
            kind: green.kind(),
            green: Arc::clone(green),
            parent,
            children: Vec::with_capacity(green.children().len()),
            full_span,
            span: TextSpan::new(offset, offset),
        });

        let mut cursor = offset;
        let mut children = Vec::with_capacity(green.children().len());
        for child in green.children() {
            match child {
                GreenElement::Node(node) => {
                    children.push(ElementRef::Node(self.build_node(node, Some(index), cursor)));
                }
                GreenElement::Token(token) => {
                    let start = cursor + token.leading_len();
                    let token_index = self.tokens.len() as u32;
                    self.tokens.push(TokenData {
                        green: Arc::clone(token),
                        parent: index,
                        full_span: TextSpan::at(cursor, token.full_len()),
                        span: TextSpan::at(start, token.text().len() as u32),
                    });
                    children.push(ElementRef::Token(token_index));
                }
            }
            cursor += child.full_len();
        }

        let span = self.compute_span(&children, offset);
        let data = &mut self.nodes[index as usize];
        data.children = children;
        data.span = span;
        index
    }

    fn compute_span(&self, children: &[ElementRef], offset: u32) -> TextSpan {
        let first = children.iter().find_map(|c| self.element_span(*c));
        let last = children.iter().rev().find_map(|c| self.element_span(*c));
        match (first, last) {
            (Some(first), Some(last)) => TextSpan::new(first.start, last.end),
            _ => TextSpan::new(offset, offset),
        }
    }

    /// Span of a child element, skipping empty nodes.
    fn element_span(&self, element: ElementRef) -> Option<TextSpan> {
        match element {
            ElementRef::Token(i) => Some(self.tokens[i as usize].span),
            ElementRef::Node(i) => {
                let node = &self.nodes[i as usize];
                let has_tokens = node.green.first_token().is_some();
                has_tokens.then_some(node.span)
            }
        }
    }

    #[inline]
    pub fn id(&self) -> TreeId {
        self.id
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn green_root(&self) -> &Arc<GreenNode> {
        &self.root
    }

    pub fn diagnostics(&self) -> &[ParseDiagnostic] {
        &self.diagnostics
    }

    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode {
            tree: self,
            index: 0,
        }
    }

    /// Look up a node handle. `None` when the handle belongs to another tree.
    pub fn node(&self, id: NodeId) -> Option<SyntaxNode<'_>> {
        (id.tree == self.id && (id.index as usize) < self.nodes.len()).then_some(SyntaxNode {
            tree: self,
            index: id.index,
        })
    }

    /// Look up a token handle. `None` when the handle belongs to another tree.
    pub fn token(&self, id: TokenId) -> Option<SyntaxToken<'_>> {
        (id.tree == self.id && (id.index as usize) < self.tokens.len()).then_some(SyntaxToken {
            tree: self,
            index: id.index,
        })
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn tokens(&self) -> impl Iterator<Item = SyntaxToken<'_>> + '_ {
        (0..self.tokens.len() as u32).map(move |index| SyntaxToken { tree: self, index })
    }

    /// Find the token whose full span (text plus trivia) contains `offset`.
    /// Offsets at or past the end of the text select the end-of-file token.
    pub fn token_at_offset(&self, offset: u32) -> Option<SyntaxToken<'_>> {
        let last = self.tokens.len().checked_sub(1)?;
        let index = self
            .tokens
            .partition_point(|t| t.full_span.end <= offset)
            .min(last);
        Some(SyntaxToken {
            tree: self,
            index: index as u32,
        })
    }

    /// Find the innermost node of `kind` whose span covers `span`.
    pub fn covering_node(&self, span: TextSpan, kind: SyntaxKind) -> Option<SyntaxNode<'_>> {
        let token = self.token_at_offset(span.start)?;
        token
            .parent()
            .ancestors()
            .find(|node| node.kind() == kind && node.span().contains_span(span))
    }
}

/// A borrowed view of a node inside a tree.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'t> {
    tree: &'t SyntaxTree,
    index: u32,
}

/// A borrowed view of a token inside a tree.
#[derive(Clone, Copy)]
pub struct SyntaxToken<'t> {
    tree: &'t SyntaxTree,
    index: u32,
}

#[derive(Clone, Copy)]
pub enum SyntaxElement<'t> {
    Node(SyntaxNode<'t>),
    Token(SyntaxToken<'t>),
}

impl<'t> SyntaxElement<'t> {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            SyntaxElement::Node(node) => node.kind(),
            SyntaxElement::Token(token) => token.kind(),
        }
    }

    pub fn as_node(&self) -> Option<SyntaxNode<'t>> {
        match self {
            SyntaxElement::Node(node) => Some(*node),
            SyntaxElement::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<SyntaxToken<'t>> {
        match self {
            SyntaxElement::Token(token) => Some(*token),
            SyntaxElement::Node(_) => None,
        }
    }

    pub fn green(&self) -> GreenElement {
        match self {
            SyntaxElement::Node(node) => GreenElement::Node(Arc::clone(node.green())),
            SyntaxElement::Token(token) => GreenElement::Token(Arc::clone(token.green())),
        }
    }
}

impl<'t> SyntaxNode<'t> {
    #[inline]
    fn data(&self) -> &'t NodeData {
        &self.tree.nodes[self.index as usize]
    }

    pub fn id(&self) -> NodeId {
        NodeId {
            tree: self.tree.id,
            index: self.index,
        }
    }

    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }

    pub fn green(&self) -> &'t Arc<GreenNode> {
        &self.data().green
    }

    /// Span of the node's text, excluding the outer trivia.
    pub fn span(&self) -> TextSpan {
        self.data().span
    }

    /// Span including leading trivia of the first token and trailing trivia
    /// of the last.
    pub fn full_span(&self) -> TextSpan {
        self.data().full_span
    }

    pub fn text(&self) -> &'t str {
        self.span().slice(&self.tree.text).unwrap_or("")
    }

    pub fn parent(&self) -> Option<SyntaxNode<'t>> {
        self.data().parent.map(|index| SyntaxNode {
            tree: self.tree,
            index,
        })
    }

    /// This node followed by its ancestors up to the root.
    pub fn ancestors(self) -> impl Iterator<Item = SyntaxNode<'t>> + 't {
        std::iter::successors(Some(self), |node| node.parent())
    }

    pub fn children(self) -> impl Iterator<Item = SyntaxElement<'t>> + 't {
        let tree = self.tree;
        self.data().children.iter().map(move |child| match *child {
            ElementRef::Node(index) => SyntaxElement::Node(SyntaxNode { tree, index }),
            ElementRef::Token(index) => SyntaxElement::Token(SyntaxToken { tree, index }),
        })
    }

    pub fn child_nodes(self) -> impl Iterator<Item = SyntaxNode<'t>> + 't {
        self.children().filter_map(|c| c.as_node())
    }

    pub fn child_tokens(self) -> impl Iterator<Item = SyntaxToken<'t>> + 't {
        self.children().filter_map(|c| c.as_token())
    }

    pub fn first_child_of_kind(&self, kind: SyntaxKind) -> Option<SyntaxNode<'t>> {
        self.child_nodes().find(|n| n.kind() == kind)
    }

    pub fn first_token_of_kind(&self, kind: SyntaxKind) -> Option<SyntaxToken<'t>> {
        self.child_tokens().find(|t| t.kind() == kind)
    }

    /// All nodes in this subtree in document order, starting with this node.
    pub fn descendants(self) -> impl Iterator<Item = SyntaxNode<'t>> + 't {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            let children: Vec<_> = node.child_nodes().collect();
            stack.extend(children.into_iter().rev());
            Some(node)
        })
    }

    /// All tokens in this subtree in document order.
    pub fn descendant_tokens(self) -> impl Iterator<Item = SyntaxToken<'t>> + 't {
        let mut stack = vec![SyntaxElement::Node(self)];
        std::iter::from_fn(move || {
            loop {
                match stack.pop()? {
                    SyntaxElement::Token(token) => return Some(token),
                    SyntaxElement::Node(node) => {
                        let children: Vec<_> = node.children().collect();
                        stack.extend(children.into_iter().rev());
                    }
                }
            }
        })
    }

    pub fn first_token(&self) -> Option<SyntaxToken<'t>> {
        self.descendant_tokens().next()
    }

    pub fn last_token(&self) -> Option<SyntaxToken<'t>> {
        self.descendant_tokens().last()
    }

    /// Direct identifier token, for declarations that carry their own name.
    pub fn identifier_token(&self) -> Option<SyntaxToken<'t>> {
        self.first_token_of_kind(SyntaxKind::IdentifierToken)
    }

    /// Index of this node among its parent's children.
    pub fn index_in_parent(&self) -> Option<usize> {
        let parent = self.parent()?;
        parent
            .data()
            .children
            .iter()
            .position(|c| *c == ElementRef::Node(self.index))
    }

    /// Token text without trivia, joined; `int?`, `N.Foo`, `string[]`.
    pub fn compact_text(&self) -> String {
        self.descendant_tokens().map(|t| t.text()).collect()
    }
}

impl<'t> SyntaxToken<'t> {
    #[inline]
    fn data(&self) -> &'t TokenData {
        &self.tree.tokens[self.index as usize]
    }

    pub fn id(&self) -> TokenId {
        TokenId {
            tree: self.tree.id,
            index: self.index,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data().green.kind()
    }

    pub fn green(&self) -> &'t Arc<GreenToken> {
        &self.data().green
    }

    pub fn text(&self) -> &'t str {
        self.data().green.text()
    }

    pub fn span(&self) -> TextSpan {
        self.data().span
    }

    pub fn full_span(&self) -> TextSpan {
        self.data().full_span
    }

    pub fn leading(&self) -> &'t [Trivia] {
        self.data().green.leading()
    }

    pub fn trailing(&self) -> &'t [Trivia] {
        self.data().green.trailing()
    }

    pub fn parent(&self) -> SyntaxNode<'t> {
        SyntaxNode {
            tree: self.tree,
            index: self.data().parent,
        }
    }
}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}", self.kind(), self.span())
    }
}

impl fmt::Debug for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{} {:?}", self.kind(), self.span(), self.text())
    }
}
