//! Immutable, versioned solution snapshots.

use crate::document::Document;
use crate::error::SolutionError;
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use propfix_common::{DocumentId, ProjectId};
use propfix_semantic::Compilation;
use propfix_syntax::SyntaxTree;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Monotonic version of a solution lineage. Every edit bumps it by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SolutionVersion(pub u64);

impl fmt::Display for SolutionVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// One project snapshot. Replaced whenever one of its documents changes, so
/// the cached compilation always matches the documents it was built from.
pub struct Project {
    id: ProjectId,
    name: Arc<str>,
    documents: Vec<DocumentId>,
    compilation: OnceCell<Arc<Compilation>>,
}

impl Project {
    fn new(id: ProjectId, name: Arc<str>, documents: Vec<DocumentId>) -> Self {
        Project {
            id,
            name,
            documents,
            compilation: OnceCell::new(),
        }
    }

    /// Same documents, empty compilation cache.
    fn fork(&self, documents: Vec<DocumentId>) -> Self {
        Project::new(self.id, Arc::clone(&self.name), documents)
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Document ids in the order they were added.
    pub fn document_ids(&self) -> &[DocumentId] {
        &self.documents
    }

    pub fn has_compilation(&self) -> bool {
        self.compilation.get().is_some()
    }
}

impl fmt::Debug for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Project")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("documents", &self.documents)
            .field("compiled", &self.has_compilation())
            .finish()
    }
}

#[derive(Clone, Default)]
pub struct Solution {
    version: SolutionVersion,
    projects: IndexMap<ProjectId, Arc<Project>>,
    documents: IndexMap<DocumentId, Arc<Document>>,
    next_project: u32,
    next_document: u32,
}

impl Solution {
    pub fn new() -> Self {
        Solution::default()
    }

    pub fn version(&self) -> SolutionVersion {
        self.version
    }

    fn bumped(&self) -> Solution {
        let mut next = self.clone();
        next.version = SolutionVersion(self.version.0 + 1);
        next
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    pub fn project(&self, id: ProjectId) -> Option<&Arc<Project>> {
        self.projects.get(&id)
    }

    pub fn projects(&self) -> impl Iterator<Item = &Arc<Project>> + '_ {
        self.projects.values()
    }

    pub fn document(&self, id: DocumentId) -> Option<&Arc<Document>> {
        self.documents.get(&id)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Arc<Document>> + '_ {
        self.documents.values()
    }

    pub fn document_by_name(&self, name: &str) -> Option<&Arc<Document>> {
        self.documents.values().find(|doc| doc.name() == name)
    }

    pub fn project_of(&self, document: DocumentId) -> Option<ProjectId> {
        self.documents.get(&document).map(|doc| doc.project())
    }

    /// The compilation of `project`, built on first request and cached for
    /// as long as the project snapshot lives.
    pub fn compilation(&self, project: ProjectId) -> Result<Arc<Compilation>, SolutionError> {
        let state = self
            .projects
            .get(&project)
            .ok_or(SolutionError::UnknownProject(project))?;
        let compilation = state.compilation.get_or_init(|| {
            let trees = state.documents.iter().filter_map(|id| {
                self.documents
                    .get(id)
                    .map(|doc| (*id, Arc::clone(doc.tree())))
            });
            Arc::new(Compilation::build(project, trees))
        });
        Ok(Arc::clone(compilation))
    }

    /// Compilation of the project that owns `document`.
    pub fn compilation_for(&self, document: DocumentId) -> Result<Arc<Compilation>, SolutionError> {
        let project = self
            .project_of(document)
            .ok_or(SolutionError::UnknownDocument(document))?;
        self.compilation(project)
    }

    // -----------------------------------------------------------------------
    // Edits. Each returns a new snapshot; `self` is untouched.
    // -----------------------------------------------------------------------

    pub fn with_project(&self, name: &str) -> (Solution, ProjectId) {
        let mut next = self.bumped();
        let id = ProjectId(next.next_project);
        next.next_project += 1;
        next.projects
            .insert(id, Arc::new(Project::new(id, Arc::from(name), Vec::new())));
        debug!(project = %id, name, version = %next.version, "added project");
        (next, id)
    }

    pub fn with_document(
        &self,
        project: ProjectId,
        name: &str,
        text: &str,
    ) -> Result<(Solution, DocumentId), SolutionError> {
        let state = self
            .projects
            .get(&project)
            .ok_or(SolutionError::UnknownProject(project))?;
        let duplicate = state
            .documents
            .iter()
            .filter_map(|id| self.documents.get(id))
            .any(|doc| doc.name() == name);
        if duplicate {
            return Err(SolutionError::DuplicateDocument {
                project,
                name: name.to_string(),
            });
        }

        let mut next = self.bumped();
        let id = DocumentId(next.next_document);
        next.next_document += 1;

        let mut documents = state.documents.clone();
        documents.push(id);
        next.projects.insert(project, Arc::new(state.fork(documents)));
        next.documents.insert(
            id,
            Arc::new(Document::parse(id, project, Arc::from(name), text)),
        );
        debug!(document = %id, project = %project, name, "added document");
        Ok((next, id))
    }

    /// Replace a document's text. The document is reparsed.
    pub fn with_document_text(&self, id: DocumentId, text: &str) -> Result<Solution, SolutionError> {
        let current = self
            .documents
            .get(&id)
            .ok_or(SolutionError::UnknownDocument(id))?;
        let document = Document::parse(id, current.project(), current.shared_name(), text);
        Ok(self.replace_document(document))
    }

    /// Replace a document's syntax tree as-is.
    pub fn with_document_syntax_root(
        &self,
        id: DocumentId,
        tree: SyntaxTree,
    ) -> Result<Solution, SolutionError> {
        let current = self
            .documents
            .get(&id)
            .ok_or(SolutionError::UnknownDocument(id))?;
        let document = Document::with_tree(
            id,
            current.project(),
            current.shared_name(),
            Arc::new(tree),
        );
        Ok(self.replace_document(document))
    }

    fn replace_document(&self, document: Document) -> Solution {
        let id = document.id();
        let project = document.project();
        let mut next = self.bumped();
        if let Some(state) = self.projects.get(&project) {
            next.projects
                .insert(project, Arc::new(state.fork(state.documents.clone())));
        }
        trace!(document = %id, tree = %document.tree().id(), version = %next.version, "replaced document");
        next.documents.insert(id, Arc::new(document));
        next
    }

    // -----------------------------------------------------------------------
    // Comparison
    // -----------------------------------------------------------------------

    /// Documents of `self` whose text differs from `other` (or that `other`
    /// does not have), in document order.
    pub fn changed_documents(&self, other: &Solution) -> Vec<DocumentId> {
        self.documents
            .iter()
            .filter(|(id, doc)| match other.documents.get(*id) {
                Some(theirs) => !Arc::ptr_eq(doc, theirs) && doc.text() != theirs.text(),
                None => true,
            })
            .map(|(id, _)| *id)
            .collect()
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solution")
            .field("version", &self.version)
            .field("projects", &self.projects.len())
            .field("documents", &self.documents.len())
            .finish()
    }
}
