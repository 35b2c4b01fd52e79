//! Capabilities the fix needs from its host.
//!
//! The transaction never touches a compiler or rename engine directly; it
//! goes through these two traits so hosts (and tests) can supply their own.

use crate::error::FixError;
use async_trait::async_trait;
use propfix_common::{DocumentId, ProjectId};
use propfix_semantic::{Compilation, Symbol};
use propfix_workspace::{RenameEngine, RenameError, RenameOptions, Solution};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Location to symbol, symbol to declaration: everything semantic.
#[async_trait]
pub trait SymbolResolver: Send + Sync {
    async fn compilation(
        &self,
        solution: &Solution,
        project: ProjectId,
    ) -> Result<Arc<Compilation>, FixError>;

    /// Compilation of the project owning `document`.
    async fn compilation_for(
        &self,
        solution: &Solution,
        document: DocumentId,
    ) -> Result<Arc<Compilation>, FixError> {
        let project = solution
            .project_of(document)
            .ok_or(FixError::MissingDocument(document))?;
        self.compilation(solution, project).await
    }
}

#[async_trait]
pub trait SymbolRenamer: Send + Sync {
    async fn rename_symbol(
        &self,
        solution: &Solution,
        symbol: &Symbol,
        new_name: &str,
        options: RenameOptions,
        cancel: &CancellationToken,
    ) -> Result<Solution, RenameError>;
}

/// Both capabilities backed by `propfix-workspace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkspaceServices {
    engine: RenameEngine,
}

impl WorkspaceServices {
    pub fn new() -> Self {
        WorkspaceServices::default()
    }
}

#[async_trait]
impl SymbolResolver for WorkspaceServices {
    async fn compilation(
        &self,
        solution: &Solution,
        project: ProjectId,
    ) -> Result<Arc<Compilation>, FixError> {
        Ok(solution.compilation(project)?)
    }
}

#[async_trait]
impl SymbolRenamer for WorkspaceServices {
    async fn rename_symbol(
        &self,
        solution: &Solution,
        symbol: &Symbol,
        new_name: &str,
        options: RenameOptions,
        cancel: &CancellationToken,
    ) -> Result<Solution, RenameError> {
        self.engine
            .rename_symbol(solution, symbol, new_name, &options, cancel)
    }
}
