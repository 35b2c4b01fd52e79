//! Finds the field and property again after the rename replaced their trees.

use crate::error::{FixError, SymbolRole};
use crate::locator::LocatedDeclaration;
use propfix_common::DocumentId;
use propfix_semantic::{Compilation, SymbolKey};
use tracing::debug;

/// What survives the rename: the owning document and the stable key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StableSymbol {
    pub role: SymbolRole,
    pub document: DocumentId,
    pub key: SymbolKey,
}

impl From<&LocatedDeclaration> for StableSymbol {
    fn from(located: &LocatedDeclaration) -> Self {
        StableSymbol {
            role: located.role,
            document: located.document,
            key: located.symbol.key().clone(),
        }
    }
}

/// Resolve `stable` in the post-rename compilation and return its first
/// declaration.
pub fn reresolve(
    compilation: &Compilation,
    stable: &StableSymbol,
) -> Result<LocatedDeclaration, FixError> {
    if compilation.tree(stable.document).is_none() {
        return Err(FixError::MissingDocument(stable.document));
    }
    let symbol = stable
        .key
        .resolve(compilation)
        .ok_or_else(|| FixError::LostSymbol {
            role: stable.role,
            key: stable.key.clone(),
        })?;
    let missing = || FixError::MissingDeclaration {
        role: stable.role,
        key: stable.key.clone(),
    };
    let declaration = symbol.first_declaration().ok_or_else(missing)?;
    let node = compilation
        .tree(declaration.document)
        .and_then(|tree| tree.node(declaration.node))
        .ok_or_else(missing)?;
    debug!(
        role = %stable.role,
        key = %stable.key,
        document = %declaration.document,
        "re-resolved declaration"
    );
    Ok(LocatedDeclaration {
        role: stable.role,
        document: declaration.document,
        node: declaration.node,
        span: node.span(),
        symbol,
    })
}

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod resolver_tests;
