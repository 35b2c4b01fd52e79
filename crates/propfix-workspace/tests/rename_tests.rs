//! Integration tests for the rename engine.

use propfix_common::{DocumentId, ProjectId, TextSpan};
use propfix_semantic::{Compilation, Symbol, SymbolKey};
use propfix_workspace::{
    CancellationToken, ConflictKind, ConflictResolution, RenameEngine, RenameError,
    RenameOptions, Solution,
};

fn solution_with(sources: &[(&str, &str)]) -> (Solution, Vec<DocumentId>) {
    let (mut solution, project) = Solution::new().with_project("app");
    let mut ids = Vec::new();
    for (name, text) in sources {
        let (next, id) = solution
            .with_document(project, name, text)
            .expect("add document");
        solution = next;
        ids.push(id);
    }
    (solution, ids)
}

fn symbol(solution: &Solution, key: &str) -> Symbol {
    let compilation = solution.compilation(ProjectId(0)).expect("compilation");
    key.parse::<SymbolKey>()
        .expect("key")
        .resolve(&compilation)
        .unwrap_or_else(|| panic!("no symbol {key}"))
}

fn text(solution: &Solution, id: DocumentId) -> &str {
    solution.document(id).expect("document").text()
}

const COUNTER: &str = r#"class C
{
    private int _x;
    int Get() { return _x; }
    void Set(int v) { _x = v; }
}
"#;

const BACKED: &str = r#"class C
{
    private int _x;
    public int X { get { return _x; } set { _x = value; } }
}
"#;

#[test]
fn test_rename_rewrites_declaration_and_references() {
    let (solution, ids) = solution_with(&[("C.cs", COUNTER)]);
    let field = symbol(&solution, "F:C._x");

    let renamed = RenameEngine::new()
        .rename_symbol(
            &solution,
            &field,
            "_count",
            &RenameOptions::default(),
            &CancellationToken::new(),
        )
        .expect("rename succeeds");

    assert_eq!(text(&renamed, ids[0]), COUNTER.replace("_x", "_count"));
    assert_eq!(text(&solution, ids[0]), COUNTER, "input solution untouched");
    assert_eq!(renamed.changed_documents(&solution), vec![ids[0]]);
    symbol(&renamed, "F:C._count");
}

#[test]
fn test_rename_rejects_invalid_names() {
    let (solution, _) = solution_with(&[("C.cs", COUNTER)]);
    let field = symbol(&solution, "F:C._x");
    for name in ["class", "1abc", "", "a-b"] {
        let err = RenameEngine::new()
            .rename_symbol(
                &solution,
                &field,
                name,
                &RenameOptions::default(),
                &CancellationToken::new(),
            )
            .expect_err("invalid name");
        assert_eq!(err, RenameError::InvalidName(name.to_string()), "{name:?}");
    }
}

#[test]
fn test_rename_to_same_name_changes_nothing() {
    let (solution, _) = solution_with(&[("C.cs", COUNTER)]);
    let field = symbol(&solution, "F:C._x");
    let renamed = RenameEngine::new()
        .rename_symbol(
            &solution,
            &field,
            "_x",
            &RenameOptions::default(),
            &CancellationToken::new(),
        )
        .expect("no-op rename");
    assert!(renamed.changed_documents(&solution).is_empty());
}

#[test]
fn test_rename_onto_existing_member_conflicts() {
    let (solution, _) = solution_with(&[("C.cs", BACKED)]);
    let field = symbol(&solution, "F:C._x");

    let err = RenameEngine::new()
        .rename_symbol(
            &solution,
            &field,
            "X",
            &RenameOptions::default(),
            &CancellationToken::new(),
        )
        .expect_err("field and property would share a name");
    let RenameError::Conflicts(conflicts) = err else {
        panic!("expected conflicts, got {err:?}");
    };
    assert!(
        conflicts
            .iter()
            .any(|c| c.kind == ConflictKind::Declaration
                && c.candidates.iter().any(|k| k.to_string() == "P:C.X")),
        "declaration conflict with the property: {conflicts:?}"
    );
    assert!(
        conflicts
            .iter()
            .any(|c| c.kind == ConflictKind::Reference && c.candidates.len() == 2),
        "references become ambiguous: {conflicts:?}"
    );
}

#[test]
fn test_filtered_declaration_rebinds_references_to_property() {
    let (solution, ids) = solution_with(&[("C.cs", BACKED)]);
    let field = symbol(&solution, "F:C._x");
    let declaration_span = field.first_declaration().expect("declared").name_span;
    let options = RenameOptions::default()
        .with_location_filter(move |location| !location.span.intersects_with(declaration_span));

    let err = RenameEngine::new()
        .rename_symbol(&solution, &field, "X", &options, &CancellationToken::new())
        .expect_err("references now bind to the property");
    let RenameError::Conflicts(conflicts) = err else {
        panic!("expected conflicts, got {err:?}");
    };
    assert_eq!(conflicts.len(), 2);
    for conflict in &conflicts {
        assert_eq!(conflict.kind, ConflictKind::Reference);
        assert_eq!(conflict.document, ids[0]);
        let keys: Vec<String> = conflict.candidates.iter().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["P:C.X"]);
    }
}

#[test]
fn test_predicate_can_accept_rebound_references() {
    let (solution, ids) = solution_with(&[("C.cs", BACKED)]);
    let field = symbol(&solution, "F:C._x");
    let declaration_span = field.first_declaration().expect("declared").name_span;
    let options = RenameOptions::default()
        .with_location_filter(move |location| !location.span.intersects_with(declaration_span))
        .with_conflict_predicate(|candidates: &[Symbol], _: &Compilation| {
            if candidates.iter().any(|c| c.key().to_string() == "P:C.X") {
                ConflictResolution::NoConflict
            } else {
                ConflictResolution::UseDefault
            }
        });

    let renamed = RenameEngine::new()
        .rename_symbol(&solution, &field, "X", &options, &CancellationToken::new())
        .expect("predicate suppresses the conflicts");
    assert_eq!(
        text(&renamed, ids[0]),
        r#"class C
{
    private int _x;
    public int X { get { return X; } set { X = value; } }
}
"#
    );
}

#[test]
fn test_predicate_can_force_conflict() {
    let (solution, _) = solution_with(&[("C.cs", COUNTER)]);
    let field = symbol(&solution, "F:C._x");
    let options = RenameOptions::default()
        .with_conflict_predicate(|_: &[Symbol], _: &Compilation| ConflictResolution::Conflict);

    let err = RenameEngine::new()
        .rename_symbol(&solution, &field, "_count", &options, &CancellationToken::new())
        .expect_err("forced");
    assert!(matches!(err, RenameError::Conflicts(ref c) if c.len() == 2));
}

#[test]
fn test_unresolved_same_named_access_blocks_rename() {
    let source = "class C\n{\n    private int _x;\n    void Copy(Missing m) { m._x = _x; }\n}\n";
    let (solution, ids) = solution_with(&[("C.cs", source)]);
    let field = symbol(&solution, "F:C._x");

    let err = RenameEngine::new()
        .rename_symbol(
            &solution,
            &field,
            "_count",
            &RenameOptions::default(),
            &CancellationToken::new(),
        )
        .expect_err("m._x might be the field");
    let RenameError::Conflicts(conflicts) = err else {
        panic!("expected conflicts, got {err:?}");
    };
    let start = source.find("m._x").expect("access") as u32 + 2;
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].kind, ConflictKind::Unresolved);
    assert_eq!(conflicts[0].document, ids[0]);
    assert_eq!(conflicts[0].span, TextSpan::at(start, 2));
    assert!(conflicts[0].candidates.is_empty());
}

#[test]
fn test_rename_spans_documents() {
    let first = "partial class C { private int _x; }";
    let second = "partial class C { int Twice() { return _x + _x; } }";
    let (solution, ids) = solution_with(&[("C1.cs", first), ("C2.cs", second)]);
    let field = symbol(&solution, "F:C._x");

    let renamed = RenameEngine::new()
        .rename_symbol(
            &solution,
            &field,
            "_y",
            &RenameOptions::default(),
            &CancellationToken::new(),
        )
        .expect("rename across documents");
    assert_eq!(text(&renamed, ids[0]), "partial class C { private int _y; }");
    assert_eq!(
        text(&renamed, ids[1]),
        "partial class C { int Twice() { return _y + _y; } }"
    );
    assert_eq!(renamed.changed_documents(&solution), ids);
}

#[test]
fn test_symbol_from_older_snapshot_is_resolved_by_key() {
    let (solution, ids) = solution_with(&[("C.cs", COUNTER), ("D.cs", "class D { }")]);
    let field = symbol(&solution, "F:C._x");
    let later = solution
        .with_document_text(ids[1], "class D { int _d; }")
        .expect("edit D");

    let renamed = RenameEngine::new()
        .rename_symbol(
            &later,
            &field,
            "_count",
            &RenameOptions::default(),
            &CancellationToken::new(),
        )
        .expect("old handle still renames");
    assert_eq!(text(&renamed, ids[0]), COUNTER.replace("_x", "_count"));
    assert_eq!(text(&renamed, ids[1]), "class D { int _d; }");
}

#[test]
fn test_unknown_symbol_is_reported() {
    let (solution, ids) = solution_with(&[("C.cs", COUNTER)]);
    let field = symbol(&solution, "F:C._x");
    let later = solution
        .with_document_text(ids[0], "class C { }")
        .expect("drop field");
    let err = RenameEngine::new()
        .rename_symbol(
            &later,
            &field,
            "_y",
            &RenameOptions::default(),
            &CancellationToken::new(),
        )
        .expect_err("field is gone");
    assert_eq!(err, RenameError::UnknownSymbol(field.key().clone()));
}

#[test]
fn test_cancelled_rename_returns_error() {
    let (solution, _) = solution_with(&[("C.cs", COUNTER)]);
    let field = symbol(&solution, "F:C._x");
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = RenameEngine::new()
        .rename_symbol(&solution, &field, "_y", &RenameOptions::default(), &cancel)
        .expect_err("cancelled");
    assert_eq!(err, RenameError::Cancelled);
}
