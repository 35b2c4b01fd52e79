//! Reference finding across all documents of a compilation.

use crate::compilation::Compilation;
use crate::symbol::Symbol;
use propfix_common::{DocumentId, TextSpan};
use propfix_syntax::SyntaxKind;
use serde::Serialize;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceLocation {
    pub document: DocumentId,
    /// Span of the name token.
    pub span: TextSpan,
    pub is_declaration: bool,
}

impl Compilation {
    /// Every declaration name and every unambiguous reference to `symbol`,
    /// in document order.
    ///
    /// A symbol from another compilation is first re-resolved here by key.
    pub fn find_references(&self, symbol: &Symbol) -> Vec<ReferenceLocation> {
        let symbol = if symbol.compilation_id() == self.id() {
            symbol.clone()
        } else {
            match symbol.key().resolve(self) {
                Some(resolved) => resolved,
                None => {
                    trace!(key = %symbol.key(), "symbol not present in compilation");
                    return Vec::new();
                }
            }
        };

        let mut locations: Vec<ReferenceLocation> = symbol
            .declarations()
            .iter()
            .map(|declaration| ReferenceLocation {
                document: declaration.document,
                span: declaration.name_span,
                is_declaration: true,
            })
            .collect();

        for (token, candidates) in &self.bindings {
            if candidates.len() != 1 || candidates[0] != symbol.id() {
                continue;
            }
            let Some(document) = self.document_of_tree(token.tree) else {
                continue;
            };
            let Some(span) = self
                .tree(document)
                .and_then(|tree| tree.token(*token))
                .map(|t| t.span())
            else {
                continue;
            };
            locations.push(ReferenceLocation {
                document,
                span,
                is_declaration: false,
            });
        }

        locations.sort_by_key(|location| {
            (self.document_index(location.document), location.span.start)
        });
        locations.dedup();
        debug!(
            key = %symbol.key(),
            count = locations.len(),
            "found references"
        );
        locations
    }

    /// Names spelled `name` in expression position that bind to nothing or
    /// to more than one symbol, in document order.
    ///
    /// `find_references` cannot say whether these mean a given symbol, so a
    /// rename has to treat them as possible references it would miss.
    pub fn unresolved_references(&self, name: &str) -> Vec<ReferenceLocation> {
        let mut locations = Vec::new();
        for (document, tree) in self.documents() {
            for token in tree.tokens() {
                if token.kind() != SyntaxKind::IdentifierToken || token.text() != name {
                    continue;
                }
                let node = token.parent();
                if node.kind() != SyntaxKind::IdentifierName
                    || !node.parent().is_some_and(|p| is_expression_context(p.kind()))
                {
                    continue;
                }
                let resolved = self
                    .bindings
                    .get(&token.id())
                    .is_some_and(|candidates| candidates.len() == 1);
                if !resolved {
                    trace!(%document, span = %token.span(), name, "unresolved name");
                    locations.push(ReferenceLocation {
                        document,
                        span: token.span(),
                        is_declaration: false,
                    });
                }
            }
        }
        locations
    }
}

fn is_expression_context(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::MemberAccessExpression
            | SyntaxKind::InvocationExpression
            | SyntaxKind::AssignmentExpression
            | SyntaxKind::BinaryExpression
            | SyntaxKind::PrefixUnaryExpression
            | SyntaxKind::PostfixUnaryExpression
            | SyntaxKind::ParenthesizedExpression
            | SyntaxKind::Argument
            | SyntaxKind::EqualsValueClause
            | SyntaxKind::ArrowExpressionClause
            | SyntaxKind::ReturnStatement
            | SyntaxKind::ExpressionStatement
            | SyntaxKind::IfStatement
    )
}
