use propfix_semantic::{Compilation, Symbol, SymbolKind};
use propfix_workspace::{ConflictPredicate, ConflictResolution};
use std::sync::Arc;
use tracing::trace;

/// Accepts a renamed field reference that now binds to the target property.
///
/// Renaming `_x` to `X` makes every former field reference bind to the
/// property `X`. The rename engine sees a changed binding and would flag a
/// conflict; here that binding is exactly the goal.
pub struct PropertyConflictPredicate {
    property: Symbol,
    compilation: Arc<Compilation>,
}

impl PropertyConflictPredicate {
    /// `compilation` must be the one `property` came from.
    pub fn new(property: Symbol, compilation: Arc<Compilation>) -> Self {
        PropertyConflictPredicate {
            property,
            compilation,
        }
    }
}

impl ConflictPredicate for PropertyConflictPredicate {
    fn resolve(&self, candidates: &[Symbol], _compilation: &Compilation) -> ConflictResolution {
        let matches_target = candidates
            .iter()
            .filter(|candidate| candidate.kind() == SymbolKind::Property)
            .filter_map(|candidate| candidate.key().resolve(&self.compilation))
            .any(|resolved| resolved == self.property);
        if matches_target {
            trace!(property = %self.property.key(), "reference binds to target property");
            ConflictResolution::NoConflict
        } else {
            ConflictResolution::UseDefault
        }
    }
}

#[cfg(test)]
#[path = "../tests/predicate_tests.rs"]
mod predicate_tests;
