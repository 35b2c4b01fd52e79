use propfix_common::{DocumentId, ProjectId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolutionError {
    #[error("document {0} is not part of the solution")]
    UnknownDocument(DocumentId),

    #[error("project {0} is not part of the solution")]
    UnknownProject(ProjectId),

    #[error("a document named `{name}` already exists in {project}")]
    DuplicateDocument { project: ProjectId, name: String },
}
