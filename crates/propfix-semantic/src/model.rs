//! Per-document view of a compilation.

use crate::compilation::Compilation;
use crate::symbol::Symbol;
use propfix_common::DocumentId;
use propfix_syntax::{NodeId, SyntaxTree, TokenId};
use std::sync::Arc;

/// What a name token refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolInfo {
    /// Set when the name binds to exactly one symbol.
    pub symbol: Option<Symbol>,
    /// Every symbol the name could refer to when it is ambiguous.
    pub candidates: Vec<Symbol>,
}

impl SymbolInfo {
    pub fn is_empty(&self) -> bool {
        self.symbol.is_none() && self.candidates.is_empty()
    }

    /// The bound symbol, or the candidates.
    pub fn all(&self) -> Vec<Symbol> {
        match &self.symbol {
            Some(symbol) => vec![symbol.clone()],
            None => self.candidates.clone(),
        }
    }
}

#[derive(Clone, Copy)]
pub struct SemanticModel<'c> {
    compilation: &'c Compilation,
    document: DocumentId,
    tree: &'c Arc<SyntaxTree>,
}

impl<'c> SemanticModel<'c> {
    pub(crate) fn new(
        compilation: &'c Compilation,
        document: DocumentId,
        tree: &'c Arc<SyntaxTree>,
    ) -> Self {
        SemanticModel {
            compilation,
            document,
            tree,
        }
    }

    pub fn compilation(&self) -> &'c Compilation {
        self.compilation
    }

    pub fn document(&self) -> DocumentId {
        self.document
    }

    pub fn tree(&self) -> &'c Arc<SyntaxTree> {
        self.tree
    }

    /// Symbol declared by a declaration node (declarator, property, ...).
    pub fn declared_symbol(&self, node: NodeId) -> Option<Symbol> {
        if node.tree != self.tree.id() {
            return None;
        }
        self.compilation.declared_symbol(node)
    }

    pub fn symbol_info(&self, token: TokenId) -> SymbolInfo {
        if token.tree != self.tree.id() {
            return SymbolInfo::default();
        }
        let mut bound = self.compilation.bound_symbols(token);
        if bound.len() == 1 {
            SymbolInfo {
                symbol: bound.pop(),
                candidates: Vec::new(),
            }
        } else {
            SymbolInfo {
                symbol: None,
                candidates: bound,
            }
        }
    }

    /// Symbol info of the token at `offset`.
    pub fn symbol_info_at(&self, offset: u32) -> SymbolInfo {
        match self.tree.token_at_offset(offset) {
            Some(token) => self.symbol_info(token.id()),
            None => SymbolInfo::default(),
        }
    }
}
