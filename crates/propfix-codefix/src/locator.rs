//! Finds the field declarator and the property declaration a diagnostic
//! points at.

use crate::diagnostic::Location;
use crate::error::{FixError, SymbolRole};
use propfix_common::{DocumentId, TextSpan};
use propfix_semantic::{Compilation, Symbol, SymbolKind};
use propfix_syntax::{NodeId, SyntaxKind};
use tracing::trace;

/// A declaration node and the symbol it declares, valid only for the
/// compilation it was found in.
#[derive(Debug, Clone)]
pub struct LocatedDeclaration {
    pub role: SymbolRole,
    pub document: DocumentId,
    pub node: NodeId,
    /// Span of the declaration node, without trivia.
    pub span: TextSpan,
    pub symbol: Symbol,
}

pub fn locate_field(
    compilation: &Compilation,
    location: &Location,
) -> Result<LocatedDeclaration, FixError> {
    locate(
        compilation,
        location,
        SymbolRole::Field,
        SyntaxKind::VariableDeclarator,
        SymbolKind::Field,
    )
}

pub fn locate_property(
    compilation: &Compilation,
    location: &Location,
) -> Result<LocatedDeclaration, FixError> {
    locate(
        compilation,
        location,
        SymbolRole::Property,
        SyntaxKind::PropertyDeclaration,
        SymbolKind::Property,
    )
}

fn locate(
    compilation: &Compilation,
    location: &Location,
    role: SymbolRole,
    node_kind: SyntaxKind,
    symbol_kind: SymbolKind,
) -> Result<LocatedDeclaration, FixError> {
    let model = compilation
        .semantic_model(location.document)
        .ok_or(FixError::MissingDocument(location.document))?;
    let node = model
        .tree()
        .covering_node(location.span, node_kind)
        .ok_or(FixError::UnexpectedSyntax {
            document: location.document,
            span: location.span,
            expected: node_kind,
        })?;
    let symbol = model
        .declared_symbol(node.id())
        .filter(|symbol| symbol.kind() == symbol_kind)
        .ok_or(FixError::MissingSymbol {
            role,
            document: location.document,
            span: location.span,
        })?;
    trace!(%role, key = %symbol.key(), node = ?node, "located declaration");
    Ok(LocatedDeclaration {
        role,
        document: location.document,
        node: node.id(),
        span: node.span(),
        symbol,
    })
}

#[cfg(test)]
#[path = "../tests/locator_tests.rs"]
mod locator_tests;
