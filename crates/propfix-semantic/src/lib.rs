//! Semantic layer for propfix.
//!
//! A `Compilation` binds every document of one project. Symbols are handed
//! out as `Symbol` handles tied to the compilation that produced them; the
//! serializable `SymbolKey` is the only way to find "the same" symbol in a
//! later compilation.

mod binder;

pub mod compilation;
pub use compilation::{Compilation, CompilationId};

pub mod key;
pub use key::{SymbolKey, SymbolKeyParseError};

pub mod model;
pub use model::{SemanticModel, SymbolInfo};

pub mod references;
pub use references::ReferenceLocation;

pub mod symbol;
pub use symbol::{Declaration, Symbol, SymbolId, SymbolKind};
