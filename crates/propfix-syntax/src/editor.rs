//! Batched structural edits over one syntax tree snapshot.
//!
//! A `SyntaxEditor` records removals and replacements against the tree it was
//! created for. Nothing is applied until `changed_root`, which rebuilds the
//! green tree once, reusing every untouched subtree, and returns a new
//! `SyntaxTree` with a fresh `TreeId`.
//!
//! Trivia that must survive a removal (kept exterior trivia, unbalanced
//! preprocessor directives, elastic markers) is carried forward and prepended
//! to the leading trivia of the next surviving token.

use crate::green::{DirectiveKind, GreenElement, GreenNode, GreenToken, Trivia, TriviaKind};
use crate::kind::SyntaxKind;
use crate::tree::{NodeId, SyntaxNode, SyntaxToken, SyntaxTree, TreeId};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

bitflags::bitflags! {
    /// What to keep when a node is removed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RemoveOptions: u8 {
        const KEEP_LEADING_TRIVIA = 1 << 0;
        const KEEP_TRAILING_TRIVIA = 1 << 1;
        /// Keep `#if`/`#region` style directives that do not have their
        /// partner inside the removed node.
        const KEEP_UNBALANCED_DIRECTIVES = 1 << 2;
        /// Leave a zero-width elastic marker where the node was.
        const ADD_ELASTIC_MARKER = 1 << 3;
        const KEEP_EXTERIOR_TRIVIA = Self::KEEP_LEADING_TRIVIA.bits() | Self::KEEP_TRAILING_TRIVIA.bits();
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// A node handle (or the batch itself) belongs to a different snapshot.
    #[error("stale node: edit targets {found}, tree is {expected}")]
    StaleNode { expected: TreeId, found: TreeId },

    /// Two edits touch the same node, or one is inside the other's subtree.
    #[error("overlapping edits on {kind:?}")]
    OverlappingEdit { kind: SyntaxKind },

    #[error("invalid edit: {0}")]
    InvalidEdit(String),
}

#[derive(Debug, Clone)]
pub enum SyntaxEdit {
    Remove {
        node: NodeId,
        options: RemoveOptions,
    },
    Replace {
        node: NodeId,
        replacement: Arc<GreenNode>,
    },
}

impl SyntaxEdit {
    pub fn node(&self) -> NodeId {
        match self {
            SyntaxEdit::Remove { node, .. } | SyntaxEdit::Replace { node, .. } => *node,
        }
    }
}

/// An ordered set of edits recorded against one tree snapshot.
#[derive(Debug, Clone)]
pub struct EditBatch {
    tree: TreeId,
    edits: Vec<SyntaxEdit>,
}

impl EditBatch {
    pub fn new(tree: TreeId) -> Self {
        EditBatch {
            tree,
            edits: Vec::new(),
        }
    }

    pub fn tree(&self) -> TreeId {
        self.tree
    }

    pub fn push(&mut self, edit: SyntaxEdit) {
        self.edits.push(edit);
    }

    pub fn edits(&self) -> &[SyntaxEdit] {
        &self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Apply every edit in one rebuild and return the new tree.
    pub fn apply(&self, tree: &SyntaxTree) -> Result<SyntaxTree, EditError> {
        if self.tree != tree.id() {
            return Err(EditError::StaleNode {
                expected: tree.id(),
                found: self.tree,
            });
        }

        let mut actions: FxHashMap<u32, &SyntaxEdit> = FxHashMap::default();
        for edit in &self.edits {
            let id = edit.node();
            let node = tree.node(id).ok_or(EditError::StaleNode {
                expected: tree.id(),
                found: id.tree,
            })?;
            if node.parent().is_none() {
                return Err(EditError::InvalidEdit(
                    "the root node cannot be edited".to_string(),
                ));
            }
            if actions.insert(id.index, edit).is_some() {
                return Err(EditError::OverlappingEdit { kind: node.kind() });
            }
        }

        // Every ancestor of an edited node must be rebuilt; an edited ancestor
        // means the edits nest.
        let mut dirty: FxHashSet<u32> = FxHashSet::default();
        for &index in actions.keys() {
            let id = NodeId {
                tree: tree.id(),
                index,
            };
            let Some(node) = tree.node(id) else { continue };
            for ancestor in node.ancestors().skip(1) {
                let ancestor_index = ancestor.id().index;
                if actions.contains_key(&ancestor_index) {
                    return Err(EditError::OverlappingEdit { kind: node.kind() });
                }
                dirty.insert(ancestor_index);
            }
        }

        let mut dropped_tokens: FxHashSet<u32> = FxHashSet::default();
        for edit in &self.edits {
            if let SyntaxEdit::Remove { node, .. } = edit {
                if let Some(separator) = tree.node(*node).and_then(list_separator) {
                    dropped_tokens.insert(separator.id().index);
                }
            }
        }

        let mut rebuild = Rebuild {
            actions: &actions,
            dirty: &dirty,
            dropped_tokens: &dropped_tokens,
            pending: Vec::new(),
        };
        let root = rebuild.rebuild_root(tree.root());
        debug!(
            edits = self.edits.len(),
            from = %tree.id(),
            "applied edit batch"
        );
        Ok(SyntaxTree::new(Arc::new(root)))
    }
}

/// Records edits against one tree; see the module docs.
pub struct SyntaxEditor<'t> {
    tree: &'t SyntaxTree,
    batch: EditBatch,
}

impl<'t> SyntaxEditor<'t> {
    pub fn new(tree: &'t SyntaxTree) -> Self {
        SyntaxEditor {
            tree,
            batch: EditBatch::new(tree.id()),
        }
    }

    pub fn remove_node(&mut self, node: NodeId, options: RemoveOptions) {
        self.batch.push(SyntaxEdit::Remove { node, options });
    }

    pub fn replace_node(&mut self, node: NodeId, replacement: GreenNode) {
        self.batch.push(SyntaxEdit::Replace {
            node,
            replacement: Arc::new(replacement),
        });
    }

    pub fn batch(&self) -> &EditBatch {
        &self.batch
    }

    pub fn into_batch(self) -> EditBatch {
        self.batch
    }

    pub fn changed_root(&self) -> Result<SyntaxTree, EditError> {
        self.batch.apply(self.tree)
    }
}

/// The comma that goes away with `node` when it sits in a separated list:
/// the following one, or the preceding one for the last element.
fn list_separator(node: SyntaxNode<'_>) -> Option<SyntaxToken<'_>> {
    let parent = node.parent()?;
    if !matches!(
        parent.kind(),
        SyntaxKind::VariableDeclaration | SyntaxKind::ParameterList | SyntaxKind::ArgumentList
    ) {
        return None;
    }
    let siblings: Vec<_> = parent.children().collect();
    let position = node.index_in_parent()?;
    let is_comma = |i: usize| {
        siblings
            .get(i)
            .and_then(|e| e.as_token())
            .filter(|t| t.kind() == SyntaxKind::CommaToken)
    };
    is_comma(position + 1).or_else(|| position.checked_sub(1).and_then(is_comma))
}

/// Indices (into `trivia`) of directives without a partner in the sequence.
pub(crate) fn unbalanced_directives(trivia: &[&Trivia]) -> Vec<usize> {
    let mut unbalanced = Vec::new();
    let mut open_ifs: Vec<SmallVec<[usize; 4]>> = Vec::new();
    let mut open_regions: Vec<usize> = Vec::new();

    for (i, item) in trivia.iter().enumerate() {
        let TriviaKind::Directive(kind) = item.kind else {
            continue;
        };
        match kind {
            DirectiveKind::If => open_ifs.push(SmallVec::from_elem(i, 1)),
            DirectiveKind::Elif | DirectiveKind::Else => match open_ifs.last_mut() {
                Some(group) => group.push(i),
                None => unbalanced.push(i),
            },
            DirectiveKind::EndIf => {
                if open_ifs.pop().is_none() {
                    unbalanced.push(i);
                }
            }
            DirectiveKind::Region => open_regions.push(i),
            DirectiveKind::EndRegion => {
                if open_regions.pop().is_none() {
                    unbalanced.push(i);
                }
            }
            DirectiveKind::Other => {}
        }
    }
    unbalanced.extend(open_ifs.into_iter().flatten());
    unbalanced.extend(open_regions);
    unbalanced.sort_unstable();
    unbalanced
}

struct Rebuild<'a> {
    actions: &'a FxHashMap<u32, &'a SyntaxEdit>,
    dirty: &'a FxHashSet<u32>,
    dropped_tokens: &'a FxHashSet<u32>,
    /// Trivia waiting for the next surviving token.
    pending: Vec<Trivia>,
}

impl Rebuild<'_> {
    fn rebuild_root(&mut self, root: SyntaxNode<'_>) -> GreenNode {
        let children = self.rebuild_children(root);
        GreenNode::new(root.kind(), children)
    }

    fn rebuild_children(&mut self, node: SyntaxNode<'_>) -> Vec<GreenElement> {
        let mut children = Vec::new();
        for child in node.children() {
            match child.as_node() {
                Some(child) => {
                    if let Some(element) = self.rebuild_node(child) {
                        children.push(element);
                    }
                }
                None => {
                    let Some(token) = child.as_token() else { continue };
                    if self.dropped_tokens.contains(&token.id().index) {
                        self.absorb_separator(token);
                    } else {
                        children.push(self.emit_token(token.green()));
                    }
                }
            }
        }
        children
    }

    fn rebuild_node(&mut self, node: SyntaxNode<'_>) -> Option<GreenElement> {
        let index = node.id().index;
        let actions = self.actions;
        match actions.get(&index) {
            Some(SyntaxEdit::Remove { options, .. }) => {
                trace!(kind = ?node.kind(), span = %node.span(), "removing node");
                self.absorb_removed(node, *options);
                None
            }
            Some(SyntaxEdit::Replace { replacement, .. }) => {
                trace!(kind = ?node.kind(), span = %node.span(), "replacing node");
                Some(self.emit_node(replacement))
            }
            None if self.dirty.contains(&index) => {
                let children = self.rebuild_children(node);
                Some(GreenElement::from(GreenNode::new(node.kind(), children)))
            }
            None => Some(self.emit_node(node.green())),
        }
    }

    fn emit_node(&mut self, green: &Arc<GreenNode>) -> GreenElement {
        if self.pending.is_empty() || green.first_token().is_none() {
            return GreenElement::Node(Arc::clone(green));
        }
        let pending = std::mem::take(&mut self.pending);
        GreenElement::from(green.map_first_token(|token| prepend_leading(token, pending)))
    }

    fn emit_token(&mut self, green: &Arc<GreenToken>) -> GreenElement {
        if self.pending.is_empty() {
            return GreenElement::Token(Arc::clone(green));
        }
        let pending = std::mem::take(&mut self.pending);
        GreenElement::from(prepend_leading(green, pending))
    }

    fn absorb_removed(&mut self, node: SyntaxNode<'_>, options: RemoveOptions) {
        let tokens: Vec<_> = node.descendant_tokens().collect();
        let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
            return;
        };

        if options.contains(RemoveOptions::KEEP_LEADING_TRIVIA) {
            self.pending.extend(first.leading().iter().cloned());
        }

        if options.contains(RemoveOptions::KEEP_UNBALANCED_DIRECTIVES) {
            // (already kept with the leading trivia?, trivia)
            let mut all: Vec<(bool, &Trivia)> = Vec::new();
            for (i, token) in tokens.iter().enumerate() {
                let kept = i == 0 && options.contains(RemoveOptions::KEEP_LEADING_TRIVIA);
                all.extend(token.leading().iter().map(|t| (kept, t)));
                all.extend(token.trailing().iter().map(|t| (false, t)));
            }
            let trivia: Vec<&Trivia> = all.iter().map(|(_, t)| *t).collect();
            for i in unbalanced_directives(&trivia) {
                let (kept, directive) = all[i];
                if !kept {
                    trace!(directive = %directive.text.trim_end(), "keeping unbalanced directive");
                    self.pending.push(directive.clone());
                }
            }
        }

        if options.contains(RemoveOptions::KEEP_TRAILING_TRIVIA) {
            self.pending.extend(last.trailing().iter().cloned());
        }

        if options.contains(RemoveOptions::ADD_ELASTIC_MARKER) {
            self.pending.push(Trivia::elastic());
        }
    }

    /// A dropped list separator never takes a directive with it.
    fn absorb_separator(&mut self, token: SyntaxToken<'_>) {
        self.pending.extend(
            token
                .leading()
                .iter()
                .chain(token.trailing())
                .filter(|t| t.is_directive())
                .cloned(),
        );
    }
}

fn prepend_leading(token: &GreenToken, mut trivia: Vec<Trivia>) -> GreenToken {
    trivia.extend(token.leading().iter().cloned());
    token.clone().with_leading(trivia)
}

#[cfg(test)]
#[path = "../tests/directive_tests.rs"]
mod directive_tests;
