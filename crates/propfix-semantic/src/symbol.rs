//! Symbols and symbol handles.

use crate::compilation::CompilationId;
use crate::key::SymbolKey;
use propfix_common::{DocumentId, TextSpan};
use propfix_syntax::NodeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Namespace,
    NamedType,
    Field,
    Property,
    Method,
    Parameter,
    Local,
}

impl SymbolKind {
    pub fn is_member(self) -> bool {
        matches!(
            self,
            SymbolKind::Field | SymbolKind::Property | SymbolKind::Method
        )
    }
}

/// One declaring piece of syntax. Partial types have several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub document: DocumentId,
    /// The declaring node: `VariableDeclarator`, `PropertyDeclaration`, ...
    pub node: NodeId,
    /// Span of the name token.
    pub name_span: TextSpan,
}

#[derive(Debug)]
pub struct SymbolData {
    pub kind: SymbolKind,
    pub name: String,
    pub container: Option<SymbolId>,
    /// Declared type as written (`int?`, `N.Point`), for typed symbols.
    pub type_name: Option<String>,
    /// Parameter count, for methods.
    pub arity: u32,
    pub key: SymbolKey,
    pub declarations: Vec<Declaration>,
}

/// A symbol of one particular compilation.
///
/// Handles compare equal only when they come from the same compilation and
/// name the same symbol; a symbol from an older compilation never equals its
/// counterpart in a newer one. Use `SymbolKey` to cross that boundary.
#[derive(Clone)]
pub struct Symbol {
    compilation: CompilationId,
    id: SymbolId,
    data: Arc<SymbolData>,
}

impl Symbol {
    pub(crate) fn new(compilation: CompilationId, id: SymbolId, data: Arc<SymbolData>) -> Self {
        Symbol {
            compilation,
            id,
            data,
        }
    }

    pub fn compilation_id(&self) -> CompilationId {
        self.compilation
    }

    pub fn id(&self) -> SymbolId {
        self.id
    }

    pub fn kind(&self) -> SymbolKind {
        self.data.kind
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn container(&self) -> Option<SymbolId> {
        self.data.container
    }

    pub fn type_name(&self) -> Option<&str> {
        self.data.type_name.as_deref()
    }

    pub fn arity(&self) -> u32 {
        self.data.arity
    }

    pub fn key(&self) -> &SymbolKey {
        &self.data.key
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.data.declarations
    }

    /// First declaring syntax, if the symbol has any.
    pub fn first_declaration(&self) -> Option<&Declaration> {
        self.data.declarations.first()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.compilation == other.compilation && self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.compilation.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.data.key, self.compilation)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.data.name)
    }
}
