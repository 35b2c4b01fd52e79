use propfix_common::{DocumentId, LineMap, ProjectId};
use propfix_syntax::{SyntaxTree, parse};
use std::fmt;
use std::sync::Arc;

/// One source file of a project at a fixed point in time.
///
/// The id is stable across edits; the tree (and its `TreeId`) is not.
#[derive(Clone)]
pub struct Document {
    id: DocumentId,
    project: ProjectId,
    name: Arc<str>,
    tree: Arc<SyntaxTree>,
}

impl Document {
    pub(crate) fn parse(id: DocumentId, project: ProjectId, name: Arc<str>, text: &str) -> Self {
        Document::with_tree(id, project, name, Arc::new(parse(text)))
    }

    pub(crate) fn with_tree(
        id: DocumentId,
        project: ProjectId,
        name: Arc<str>,
        tree: Arc<SyntaxTree>,
    ) -> Self {
        Document {
            id,
            project,
            name,
            tree,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn project(&self) -> ProjectId {
        self.project
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    pub fn text(&self) -> &str {
        self.tree.text()
    }

    pub fn tree(&self) -> &Arc<SyntaxTree> {
        &self.tree
    }

    pub fn line_map(&self) -> LineMap {
        LineMap::build(self.text())
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("tree", &self.tree.id())
            .finish()
    }
}
