//! Use-auto-property code fix.
//!
//! Given a diagnostic that points at a private field and the property that
//! wraps it, the fix:
//!
//! 1. locates both declarations and their symbols,
//! 2. renames the field to the property's name everywhere except the field's
//!    own declaration, treating references that now bind to the property as
//!    intended rather than as conflicts,
//! 3. finds both declarations again by symbol key in the renamed solution,
//! 4. removes the field and strips the accessor bodies, in one document or
//!    across two.
//!
//! ```text
//! private int _x;                                  public int X { get; set; }
//! public int X { get => _x; set => _x = value; }   ...
//! ... obj._x ...                            =>     ... obj.X ...
//! ```

pub mod diagnostic;
pub use diagnostic::{CodeAction, DEFAULT_EQUIVALENCE_KEY, Diagnostic, Location, USE_AUTO_PROPERTY_ID};

pub mod error;
pub use error::{FixError, SymbolRole};

pub mod locator;
pub use locator::{LocatedDeclaration, locate_field, locate_property};

pub mod options;
pub use options::FixOptions;

pub mod orchestrator;
pub use orchestrator::rename_field_to_property;

pub mod predicate;
pub use predicate::PropertyConflictPredicate;

pub mod provider;
pub use provider::{FixOutcome, USE_AUTO_PROPERTY_TITLE, UseAutoPropertyCodeFix};

pub mod resolver;
pub use resolver::{StableSymbol, reresolve};

pub mod services;
pub use services::{SymbolRenamer, SymbolResolver, WorkspaceServices};

pub mod splice;
pub use splice::{SplicePath, splice};

pub mod transaction;
pub use transaction::{Located, ReResolved, Renamed, Spliced};
