//! Solution container and rename engine.
//!
//! A `Solution` is an immutable snapshot: every edit returns a new value and
//! the old one stays valid. Compilations are built lazily, once per project
//! snapshot, and shared by every solution that still contains that snapshot.

pub mod document;
pub use document::Document;

pub mod error;
pub use error::SolutionError;

pub mod rename;
pub use rename::{
    ConflictKind, ConflictPredicate, ConflictResolution, LocationFilter, RenameConflict,
    RenameEngine, RenameError, RenameOptions,
};

pub mod solution;
pub use solution::{Project, Solution, SolutionVersion};

pub use tokio_util::sync::CancellationToken;
