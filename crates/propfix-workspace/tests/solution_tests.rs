//! Integration tests for solution snapshots and the compilation cache.

use propfix_common::{DocumentId, ProjectId};
use propfix_syntax::parse;
use propfix_workspace::{Solution, SolutionError, SolutionVersion};
use std::sync::Arc;

fn two_documents() -> (Solution, ProjectId, DocumentId, DocumentId) {
    let (solution, project) = Solution::new().with_project("app");
    let (solution, a) = solution
        .with_document(project, "A.cs", "class A { int _a; }")
        .expect("add A");
    let (solution, b) = solution
        .with_document(project, "B.cs", "class B { A a; }")
        .expect("add B");
    (solution, project, a, b)
}

#[test]
fn test_versions_increase_with_every_edit() {
    let empty = Solution::new();
    assert_eq!(empty.version(), SolutionVersion(0));
    let (solution, _, a, _) = two_documents();
    assert_eq!(solution.version(), SolutionVersion(3));
    let edited = solution
        .with_document_text(a, "class A { }")
        .expect("edit A");
    assert_eq!(edited.version(), SolutionVersion(4));
    assert_eq!(solution.version(), SolutionVersion(3), "old snapshot unchanged");
}

#[test]
fn test_documents_keep_insertion_order_and_identity() {
    let (solution, project, a, b) = two_documents();
    let names: Vec<&str> = solution.documents().map(|d| d.name()).collect();
    assert_eq!(names, vec!["A.cs", "B.cs"]);
    assert_eq!(
        solution.project(project).map(|p| p.document_ids().to_vec()),
        Some(vec![a, b])
    );
    assert_eq!(solution.project_of(b), Some(project));
    assert_eq!(solution.document_by_name("B.cs").map(|d| d.id()), Some(b));

    let edited = solution
        .with_document_text(a, "class A { int _b; }")
        .expect("edit A");
    let document = edited.document(a).expect("A survives the edit");
    assert_eq!(document.id(), a);
    assert_eq!(document.name(), "A.cs");
    assert_eq!(document.text(), "class A { int _b; }");
}

#[test]
fn test_duplicate_document_name_is_rejected() {
    let (solution, project, _, _) = two_documents();
    let err = solution
        .with_document(project, "A.cs", "class Other { }")
        .expect_err("duplicate name");
    assert_eq!(
        err,
        SolutionError::DuplicateDocument {
            project,
            name: "A.cs".to_string()
        }
    );
}

#[test]
fn test_unknown_ids_are_errors() {
    let (solution, _, _, _) = two_documents();
    assert_eq!(
        solution.with_document_text(DocumentId(99), "").err(),
        Some(SolutionError::UnknownDocument(DocumentId(99)))
    );
    assert_eq!(
        solution.compilation(ProjectId(7)).err(),
        Some(SolutionError::UnknownProject(ProjectId(7)))
    );
    assert_eq!(
        solution.compilation_for(DocumentId(99)).err(),
        Some(SolutionError::UnknownDocument(DocumentId(99)))
    );
}

#[test]
fn test_compilation_is_cached_per_project_snapshot() {
    let (solution, project, a, _) = two_documents();
    assert!(!solution.project(project).expect("project").has_compilation());

    let first = solution.compilation(project).expect("compile");
    let second = solution.compilation(project).expect("compile again");
    assert!(Arc::ptr_eq(&first, &second), "second call must hit the cache");

    let edited = solution
        .with_document_text(a, "class A { int _b; }")
        .expect("edit A");
    let rebuilt = edited.compilation(project).expect("compile edited");
    assert!(!Arc::ptr_eq(&first, &rebuilt), "edit must invalidate the cache");
    assert_ne!(first.id(), rebuilt.id());
    assert!(rebuilt.symbol_by_key(&"F:A._b".parse().expect("key")).is_some());
    assert!(first.symbol_by_key(&"F:A._a".parse().expect("key")).is_some());

    let again = solution.compilation(project).expect("old snapshot");
    assert!(Arc::ptr_eq(&first, &again), "old snapshot keeps its cache");
}

#[test]
fn test_other_projects_keep_their_compilation() {
    let (solution, app) = Solution::new().with_project("app");
    let (solution, lib) = solution.with_project("lib");
    let (solution, app_doc) = solution
        .with_document(app, "App.cs", "class App { }")
        .expect("add app doc");
    let (solution, _) = solution
        .with_document(lib, "Lib.cs", "class Lib { }")
        .expect("add lib doc");

    let lib_before = solution.compilation(lib).expect("lib");
    let edited = solution
        .with_document_text(app_doc, "class App { int _n; }")
        .expect("edit app");
    let lib_after = edited.compilation(lib).expect("lib after edit");
    assert!(Arc::ptr_eq(&lib_before, &lib_after));
    assert!(
        lib_after
            .symbol_by_key(&"T:App".parse().expect("key"))
            .is_none(),
        "projects compile separately"
    );
}

#[test]
fn test_with_document_syntax_root_installs_tree() {
    let (solution, _, a, _) = two_documents();
    let tree = parse("class A { int _z; }");
    let tree_id = tree.id();
    let edited = solution
        .with_document_syntax_root(a, tree)
        .expect("install tree");
    let document = edited.document(a).expect("A");
    assert_eq!(document.tree().id(), tree_id);
    assert_eq!(document.text(), "class A { int _z; }");
}

#[test]
fn test_changed_documents() {
    let (solution, _, a, b) = two_documents();
    assert!(solution.changed_documents(&solution).is_empty());

    let edited = solution
        .with_document_text(b, "class B { A other; }")
        .expect("edit B");
    assert_eq!(edited.changed_documents(&solution), vec![b]);

    // Same text through a fresh parse is not a change.
    let reparsed = solution
        .with_document_text(a, "class A { int _a; }")
        .expect("reparse A");
    assert!(reparsed.changed_documents(&solution).is_empty());
}
