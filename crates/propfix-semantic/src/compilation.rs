//! A bound project: every document's tree plus the symbol table over them.

use crate::binder::{Binder, Candidates};
use crate::key::SymbolKey;
use crate::model::SemanticModel;
use crate::symbol::{Symbol, SymbolData, SymbolId, SymbolKind};
use indexmap::IndexMap;
use propfix_common::{DocumentId, ProjectId};
use propfix_syntax::{NodeId, SyntaxTree, TokenId, TreeId};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

static NEXT_COMPILATION_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompilationId(u64);

impl fmt::Display for CompilationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "compilation#{}", self.0)
    }
}

pub struct Compilation {
    id: CompilationId,
    project: ProjectId,
    documents: IndexMap<DocumentId, Arc<SyntaxTree>>,
    tree_documents: FxHashMap<TreeId, DocumentId>,
    symbols: Vec<Arc<SymbolData>>,
    by_key: FxHashMap<SymbolKey, SymbolId>,
    declared: FxHashMap<NodeId, SymbolId>,
    pub(crate) bindings: FxHashMap<TokenId, Candidates>,
    members: FxHashMap<SymbolId, Vec<SymbolId>>,
}

impl Compilation {
    /// Bind all documents of one project together.
    pub fn build(
        project: ProjectId,
        documents: impl IntoIterator<Item = (DocumentId, Arc<SyntaxTree>)>,
    ) -> Compilation {
        let documents: IndexMap<DocumentId, Arc<SyntaxTree>> = documents.into_iter().collect();

        let mut binder = Binder::default();
        for (document, tree) in &documents {
            binder.declare_document(*document, tree);
        }
        for (document, tree) in &documents {
            binder.bind_document(*document, tree);
        }
        let result = binder.finish();

        let compilation = Compilation {
            id: CompilationId(NEXT_COMPILATION_ID.fetch_add(1, Ordering::Relaxed)),
            project,
            tree_documents: documents
                .iter()
                .map(|(document, tree)| (tree.id(), *document))
                .collect(),
            documents,
            symbols: result.symbols.into_iter().map(Arc::new).collect(),
            by_key: result.by_key,
            declared: result.declared,
            bindings: result.bindings,
            members: result.members,
        };
        debug!(
            id = %compilation.id,
            project = %project,
            documents = compilation.documents.len(),
            symbols = compilation.symbols.len(),
            bindings = compilation.bindings.len(),
            "built compilation"
        );
        compilation
    }

    pub fn id(&self) -> CompilationId {
        self.id
    }

    pub fn project(&self) -> ProjectId {
        self.project
    }

    pub fn documents(&self) -> impl Iterator<Item = (DocumentId, &Arc<SyntaxTree>)> + '_ {
        self.documents.iter().map(|(id, tree)| (*id, tree))
    }

    pub fn tree(&self, document: DocumentId) -> Option<&Arc<SyntaxTree>> {
        self.documents.get(&document)
    }

    pub fn document_of_tree(&self, tree: TreeId) -> Option<DocumentId> {
        self.tree_documents.get(&tree).copied()
    }

    pub(crate) fn document_index(&self, document: DocumentId) -> usize {
        self.documents
            .get_index_of(&document)
            .unwrap_or(usize::MAX)
    }

    pub fn semantic_model(&self, document: DocumentId) -> Option<SemanticModel<'_>> {
        let tree = self.documents.get(&document)?;
        Some(SemanticModel::new(self, document, tree))
    }

    pub fn symbol(&self, id: SymbolId) -> Option<Symbol> {
        self.symbols
            .get(id.index())
            .map(|data| Symbol::new(self.id, id, Arc::clone(data)))
    }

    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        (0..self.symbols.len() as u32).filter_map(|i| self.symbol(SymbolId(i)))
    }

    pub fn symbol_by_key(&self, key: &SymbolKey) -> Option<Symbol> {
        self.symbol(*self.by_key.get(key)?)
    }

    pub fn declared_symbol(&self, node: NodeId) -> Option<Symbol> {
        self.symbol(*self.declared.get(&node)?)
    }

    /// Symbols a name token binds to; empty when it binds to nothing.
    pub fn bound_symbols(&self, token: TokenId) -> Vec<Symbol> {
        self.bindings
            .get(&token)
            .into_iter()
            .flatten()
            .filter_map(|id| self.symbol(*id))
            .collect()
    }

    pub fn containing_type(&self, symbol: &Symbol) -> Option<Symbol> {
        let mut current = symbol.container();
        while let Some(id) = current {
            let container = self.symbol(id)?;
            if container.kind() == SymbolKind::NamedType {
                return Some(container);
            }
            current = container.container();
        }
        None
    }

    /// Members (fields, properties, methods, nested types) of a type.
    pub fn members(&self, ty: &Symbol) -> Vec<Symbol> {
        if ty.compilation_id() != self.id {
            return Vec::new();
        }
        self.members
            .get(&ty.id())
            .into_iter()
            .flatten()
            .filter_map(|id| self.symbol(*id))
            .collect()
    }

    pub fn members_named(&self, ty: &Symbol, name: &str) -> Vec<Symbol> {
        self.members(ty)
            .into_iter()
            .filter(|m| m.name() == name)
            .collect()
    }
}

impl fmt::Debug for Compilation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compilation")
            .field("id", &self.id)
            .field("project", &self.project)
            .field("documents", &self.documents.len())
            .field("symbols", &self.symbols.len())
            .finish()
    }
}
