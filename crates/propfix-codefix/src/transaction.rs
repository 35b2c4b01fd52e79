//! The fix as a chain of stages.
//!
//! Each stage consumes the one before it. Node ids found before the rename
//! live only in `Located`; `Renamed` carries nothing but document ids and
//! symbol keys, so a stale node cannot reach the splice.

use crate::diagnostic::Diagnostic;
use crate::error::FixError;
use crate::locator::{LocatedDeclaration, locate_field, locate_property};
use crate::options::FixOptions;
use crate::orchestrator::rename_field_to_property;
use crate::resolver::{StableSymbol, reresolve};
use crate::services::{SymbolRenamer, SymbolResolver};
use crate::splice::{SplicePath, splice};
use propfix_semantic::Compilation;
use propfix_workspace::Solution;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

fn check_cancelled(cancel: &CancellationToken) -> Result<(), FixError> {
    if cancel.is_cancelled() {
        Err(FixError::Cancelled)
    } else {
        Ok(())
    }
}

/// Field and property found in the original solution.
#[derive(Debug)]
pub struct Located {
    solution: Solution,
    compilation: Arc<Compilation>,
    field: LocatedDeclaration,
    property: LocatedDeclaration,
}

impl Located {
    pub async fn locate(
        resolver: &dyn SymbolResolver,
        solution: &Solution,
        diagnostic: &Diagnostic,
        cancel: &CancellationToken,
    ) -> Result<Located, FixError> {
        check_cancelled(cancel)?;
        let field_document = diagnostic.field_location.document;
        let property_document = diagnostic.property_location.document;
        let field_project = solution
            .project_of(field_document)
            .ok_or(FixError::MissingDocument(field_document))?;
        let property_project = solution
            .project_of(property_document)
            .ok_or(FixError::MissingDocument(property_document))?;
        if field_project != property_project {
            return Err(FixError::ProjectMismatch {
                field: field_project,
                property: property_project,
            });
        }

        let compilation = resolver.compilation(solution, field_project).await?;
        check_cancelled(cancel)?;
        let field = locate_field(&compilation, &diagnostic.field_location)?;
        let property = locate_property(&compilation, &diagnostic.property_location)?;
        debug!(
            field = %field.symbol.key(),
            property = %property.symbol.key(),
            "located field and property"
        );
        Ok(Located {
            solution: solution.clone(),
            compilation,
            field,
            property,
        })
    }

    pub fn field(&self) -> &LocatedDeclaration {
        &self.field
    }

    pub fn property(&self) -> &LocatedDeclaration {
        &self.property
    }

    pub async fn rename(
        self,
        renamer: &dyn SymbolRenamer,
        cancel: &CancellationToken,
    ) -> Result<Renamed, FixError> {
        check_cancelled(cancel)?;
        let solution = rename_field_to_property(
            renamer,
            &self.solution,
            Arc::clone(&self.compilation),
            &self.field,
            &self.property,
            cancel,
        )
        .await?;
        debug!(version = %solution.version(), "rename finished");
        Ok(Renamed {
            solution,
            field: StableSymbol::from(&self.field),
            property: StableSymbol::from(&self.property),
        })
    }
}

/// The solution after the rename. Only stable identities survive.
#[derive(Debug)]
pub struct Renamed {
    solution: Solution,
    field: StableSymbol,
    property: StableSymbol,
}

impl Renamed {
    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub async fn reresolve(
        self,
        resolver: &dyn SymbolResolver,
        cancel: &CancellationToken,
    ) -> Result<ReResolved, FixError> {
        check_cancelled(cancel)?;
        let compilation = resolver
            .compilation_for(&self.solution, self.field.document)
            .await?;
        let property_project = self
            .solution
            .project_of(self.property.document)
            .ok_or(FixError::MissingDocument(self.property.document))?;
        if property_project != compilation.project() {
            return Err(FixError::ProjectMismatch {
                field: compilation.project(),
                property: property_project,
            });
        }
        check_cancelled(cancel)?;
        let field = reresolve(&compilation, &self.field)?;
        let property = reresolve(&compilation, &self.property)?;
        Ok(ReResolved {
            solution: self.solution,
            compilation,
            field,
            property,
        })
    }
}

/// Live declarations in the renamed solution.
#[derive(Debug)]
pub struct ReResolved {
    solution: Solution,
    compilation: Arc<Compilation>,
    field: LocatedDeclaration,
    property: LocatedDeclaration,
}

impl ReResolved {
    pub fn field(&self) -> &LocatedDeclaration {
        &self.field
    }

    pub fn property(&self) -> &LocatedDeclaration {
        &self.property
    }

    pub fn splice(self, options: &FixOptions) -> Result<Spliced, FixError> {
        let (solution, path) = splice(
            &self.solution,
            &self.compilation,
            &self.field,
            &self.property,
            options,
        )?;
        Ok(Spliced { solution, path })
    }
}

/// The finished fix.
#[derive(Debug)]
pub struct Spliced {
    pub solution: Solution,
    pub path: SplicePath,
}
