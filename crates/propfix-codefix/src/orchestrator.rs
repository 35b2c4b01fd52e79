use crate::error::FixError;
use crate::locator::LocatedDeclaration;
use crate::predicate::PropertyConflictPredicate;
use crate::services::SymbolRenamer;
use propfix_semantic::{Compilation, ReferenceLocation};
use propfix_workspace::{RenameError, RenameOptions, Solution};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Rename the field to the property's name everywhere except its own
/// declaration, which must survive as the splice target.
///
/// Node ids in `field` and `property` are meaningless against the returned
/// solution.
pub async fn rename_field_to_property(
    renamer: &dyn SymbolRenamer,
    solution: &Solution,
    compilation: Arc<Compilation>,
    field: &LocatedDeclaration,
    property: &LocatedDeclaration,
    cancel: &CancellationToken,
) -> Result<Solution, FixError> {
    let field_document = field.document;
    let exclude = field.span;
    let options = RenameOptions::default()
        .with_location_filter(move |location: &ReferenceLocation| {
            !(location.document == field_document && location.span.intersects_with(exclude))
        })
        .with_conflict_predicate(PropertyConflictPredicate::new(
            property.symbol.clone(),
            compilation,
        ));

    let new_name = property.symbol.name();
    debug!(
        field = %field.symbol.key(),
        new_name,
        excluded = %exclude,
        "renaming field to property name"
    );
    renamer
        .rename_symbol(solution, &field.symbol, new_name, options, cancel)
        .await
        .map_err(|err| match err {
            RenameError::Cancelled => FixError::Cancelled,
            other => FixError::Rename(other),
        })
}
