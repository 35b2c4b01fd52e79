//! Loads source files into a one-project solution and runs the fix.

use anyhow::{Context, Result, anyhow, bail};
use indexmap::IndexSet;
use propfix_codefix::{
    Diagnostic, FixError, FixOptions, Location, SplicePath, UseAutoPropertyCodeFix,
};
use propfix_common::{DocumentId, Position, TextSpan};
use propfix_workspace::{CancellationToken, RenameError, Solution};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::args::{CliArgs, SourcePosition};
use crate::config::{PropfixConfig, resolve_fix_options};

pub const PROJECT_NAME: &str = "propfix";

/// Everything one run needs, with paths made absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixRequest {
    pub files: Vec<PathBuf>,
    pub property: SourcePosition,
    pub field: SourcePosition,
    pub options: FixOptions,
}

impl FixRequest {
    /// The field's file comes first, then the property's, then config and
    /// command-line files. Duplicates are dropped.
    pub fn from_args(args: &CliArgs, config: &PropfixConfig, cwd: &Path) -> FixRequest {
        let property = SourcePosition {
            file: normalize(cwd, &args.property.file),
            ..args.property.clone()
        };
        let field = SourcePosition {
            file: normalize(cwd, &args.field.file),
            ..args.field.clone()
        };
        let mut files: IndexSet<PathBuf> = IndexSet::new();
        files.insert(field.file.clone());
        files.insert(property.file.clone());
        files.extend(config.files.iter().map(|file| normalize(cwd, file)));
        files.extend(args.files.iter().map(|file| normalize(cwd, file)));
        FixRequest {
            files: files.into_iter().collect(),
            property,
            field,
            options: resolve_fix_options(config, args),
        }
    }
}

/// `cwd`-relative and without `.` components, so one file is one document.
fn normalize(cwd: &Path, path: &Path) -> PathBuf {
    cwd.join(path).components().collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangedFile {
    pub path: PathBuf,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixReport {
    pub splice_path: SplicePath,
    pub changed: Vec<ChangedFile>,
}

/// Source files loaded as the documents of a single project.
pub struct LoadedProject {
    pub solution: Solution,
    documents: Vec<(PathBuf, DocumentId)>,
}

impl LoadedProject {
    pub fn load(files: &[PathBuf]) -> Result<LoadedProject> {
        let (mut solution, project) = Solution::new().with_project(PROJECT_NAME);
        let mut documents = Vec::with_capacity(files.len());
        for path in files {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read source file: {}", path.display()))?;
            let (next, id) =
                solution.with_document(project, &path.display().to_string(), &text)?;
            solution = next;
            documents.push((path.clone(), id));
        }
        debug!(documents = documents.len(), "loaded project");
        Ok(LoadedProject {
            solution,
            documents,
        })
    }

    pub fn document_id(&self, path: &Path) -> Option<DocumentId> {
        self.documents
            .iter()
            .find(|(candidate, _)| candidate == path)
            .map(|(_, id)| *id)
    }

    pub fn path(&self, id: DocumentId) -> Option<&Path> {
        self.documents
            .iter()
            .find(|(_, candidate)| *candidate == id)
            .map(|(path, _)| path.as_path())
    }

    /// An empty span at `position`.
    pub fn location(&self, position: &SourcePosition) -> Result<Location> {
        let id = self
            .document_id(&position.file)
            .ok_or_else(|| anyhow!("{} is not part of the project", position.file.display()))?;
        let document = self
            .solution
            .document(id)
            .ok_or_else(|| anyhow!("{} was not loaded", position.file.display()))?;
        let offset = document
            .line_map()
            .position_to_offset(
                Position::new(position.line - 1, position.column - 1),
                document.text(),
            )
            .ok_or_else(|| anyhow!("{position} is past the end of the file"))?;
        Ok(Location::new(id, TextSpan::at(offset, 0)))
    }
}

pub async fn run(request: &FixRequest, cancel: &CancellationToken) -> Result<FixReport> {
    let project = LoadedProject::load(&request.files)?;
    let diagnostic = Diagnostic::use_auto_property(
        project.location(&request.property)?,
        project.location(&request.field)?,
    );
    let fix = UseAutoPropertyCodeFix::new().with_options(request.options);

    let outcome = match fix.apply_fix(&project.solution, &diagnostic, cancel).await {
        Ok(outcome) => outcome,
        Err(FixError::Rename(RenameError::Conflicts(conflicts))) => {
            let lines: Vec<String> = conflicts
                .iter()
                .map(|conflict| {
                    let file = project.path(conflict.document).map_or_else(
                        || conflict.document.to_string(),
                        |path| path.display().to_string(),
                    );
                    format!("  {file}: {conflict}")
                })
                .collect();
            bail!(
                "renaming the field at {} would change what existing code refers to:\n{}",
                request.field,
                lines.join("\n")
            );
        }
        Err(err) => {
            return Err(err).with_context(|| {
                format!("cannot use an auto property at {}", request.property)
            });
        }
    };

    let changed = outcome
        .changed_documents
        .iter()
        .map(|&id| {
            let path = project
                .path(id)
                .ok_or_else(|| anyhow!("fix produced unknown document {id}"))?;
            let document = outcome
                .solution
                .document(id)
                .ok_or_else(|| anyhow!("fix dropped document {id}"))?;
            Ok(ChangedFile {
                path: path.to_path_buf(),
                text: document.text().to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(path = ?outcome.path, changed = changed.len(), "fix finished");
    Ok(FixReport {
        splice_path: outcome.path,
        changed,
    })
}

pub fn write_changes(report: &FixReport) -> Result<()> {
    for file in &report.changed {
        std::fs::write(&file.path, &file.text)
            .with_context(|| format!("failed to write {}", file.path.display()))?;
        debug!(path = %file.path.display(), "wrote file");
    }
    Ok(())
}
