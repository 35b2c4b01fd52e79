//! Error types for the use-auto-property transaction.

use propfix_common::{DocumentId, ProjectId, TextSpan};
use propfix_semantic::SymbolKey;
use propfix_syntax::{EditError, SyntaxKind};
use propfix_workspace::{RenameError, SolutionError};
use std::fmt;
use thiserror::Error;

/// Which half of the field/property pair an error is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolRole {
    Field,
    Property,
}

impl fmt::Display for SymbolRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SymbolRole::Field => "field",
            SymbolRole::Property => "property",
        })
    }
}

#[derive(Error, Debug)]
pub enum FixError {
    /// The diagnostic is not one this fix handles.
    #[error("diagnostic `{0}` is not handled by this fix")]
    UnsupportedDiagnostic(String),

    #[error("document {0} is not part of the solution")]
    MissingDocument(DocumentId),

    /// The location hint does not sit on a node of the expected kind.
    #[error("expected {expected:?} at {document}{span}")]
    UnexpectedSyntax {
        document: DocumentId,
        span: TextSpan,
        expected: SyntaxKind,
    },

    #[error("no {role} symbol declared at {document}{span}")]
    MissingSymbol {
        role: SymbolRole,
        document: DocumentId,
        span: TextSpan,
    },

    /// Re-resolving by key after the rename found nothing.
    #[error("{role} `{key}` could not be found after the rename")]
    LostSymbol { role: SymbolRole, key: SymbolKey },

    #[error("{role} `{key}` has no declaring syntax")]
    MissingDeclaration { role: SymbolRole, key: SymbolKey },

    #[error("field is in {field} but property is in {property}")]
    ProjectMismatch { field: ProjectId, property: ProjectId },

    #[error(transparent)]
    Rename(#[from] RenameError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Solution(#[from] SolutionError),

    #[error("fix cancelled")]
    Cancelled,
}

impl FixError {
    /// True for internal inconsistencies between the analyzer and this fix,
    /// as opposed to ordinary failures such as a genuine rename conflict.
    pub fn is_contract_violation(&self) -> bool {
        match self {
            FixError::UnexpectedSyntax { .. }
            | FixError::MissingSymbol { .. }
            | FixError::LostSymbol { .. }
            | FixError::MissingDeclaration { .. }
            | FixError::ProjectMismatch { .. }
            | FixError::MissingDocument(_)
            | FixError::Edit(_)
            | FixError::Solution(_) => true,
            FixError::UnsupportedDiagnostic(_) | FixError::Rename(_) | FixError::Cancelled => {
                false
            }
        }
    }
}
