//! Syntax layer for propfix.
//!
//! Source text is scanned into tokens that own their surrounding trivia, then
//! parsed into an immutable green tree. A `SyntaxTree` wraps the green root in
//! an index-based arena stamped with a fresh `TreeId`, so every `NodeId` and
//! `TokenId` is tied to exactly one snapshot. Edits never mutate a tree: the
//! `SyntaxEditor` records an `EditBatch` and rebuilds a new tree from it.

pub mod kind;
pub use kind::SyntaxKind;

pub mod green;
pub use green::{DirectiveKind, GreenElement, GreenNode, GreenToken, Trivia, TriviaKind};

pub mod scanner;
pub use scanner::Scanner;

pub mod tree;
pub use tree::{NodeId, SyntaxElement, SyntaxNode, SyntaxToken, SyntaxTree, TokenId, TreeId};

pub mod parser;
pub use parser::{ParseDiagnostic, parse};

pub mod editor;
pub use editor::{EditBatch, EditError, RemoveOptions, SyntaxEdit, SyntaxEditor};

pub mod format;
pub use format::collapse_elastic;
