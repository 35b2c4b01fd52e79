//! End-to-end tests for the use-auto-property fix.

use async_trait::async_trait;
use propfix_codefix::{
    Diagnostic, FixError, FixOptions, Location, SplicePath, SymbolRenamer, SymbolRole,
    USE_AUTO_PROPERTY_ID, USE_AUTO_PROPERTY_TITLE, UseAutoPropertyCodeFix, WorkspaceServices,
};
use propfix_common::{DocumentId, ProjectId, TextSpan};
use propfix_semantic::{ReferenceLocation, Symbol, SymbolKey};
use propfix_workspace::{
    CancellationToken, ConflictKind, RenameConflict, RenameError, RenameOptions, Solution,
};
use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

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

/// Location of the identifier `needle` starts with, searched in `document`.
fn location(solution: &Solution, document: DocumentId, needle: &str) -> Location {
    let text = solution.document(document).expect("document").text();
    let start = text
        .find(needle)
        .unwrap_or_else(|| panic!("no {needle:?} in {document}"));
    let len = needle
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .count();
    Location::new(document, TextSpan::at(start as u32, len as u32))
}

fn diagnostic(
    solution: &Solution,
    field: (DocumentId, &str),
    property: (DocumentId, &str),
) -> Diagnostic {
    Diagnostic::use_auto_property(
        location(solution, property.0, property.1),
        location(solution, field.0, field.1),
    )
}

fn text(solution: &Solution, id: DocumentId) -> &str {
    solution.document(id).expect("document").text()
}

/// The fixed project still binds: the field is gone, nothing spelled like
/// the field or the property is left unresolved, and every use of the field
/// outside the property's own accessors now binds to the property.
fn assert_still_binds(before: &Solution, after: &Solution, field: &str, property: &str) {
    let before = before.compilation(ProjectId(0)).expect("compilation before");
    let after = after.compilation(ProjectId(0)).expect("compilation after");
    let key = |k: &str| k.parse::<SymbolKey>().expect("key");

    let old_field = key(field).resolve(&before).expect("field before");
    let old_property = key(property).resolve(&before).expect("property before");
    let declaration = old_property.first_declaration().expect("property declared");
    let accessors = before
        .tree(declaration.document)
        .and_then(|tree| tree.node(declaration.node))
        .expect("property node")
        .full_span();
    let outside = |references: Vec<ReferenceLocation>| {
        references
            .into_iter()
            .filter(|r| {
                !r.is_declaration
                    && !(r.document == declaration.document && accessors.contains_span(r.span))
            })
            .count()
    };
    let expected =
        outside(before.find_references(&old_field)) + outside(before.find_references(&old_property));

    assert!(key(field).resolve(&after).is_none(), "{field} is still declared");
    let new_property = key(property).resolve(&after).expect("property after");
    for name in [old_field.name(), new_property.name()] {
        let unresolved = after.unresolved_references(name);
        assert!(unresolved.is_empty(), "unresolved `{name}`: {unresolved:?}");
    }
    let uses = after
        .find_references(&new_property)
        .into_iter()
        .filter(|r| !r.is_declaration)
        .count();
    assert_eq!(uses, expected, "uses of {property} after the fix");
}

const COPY_TO: &str = "class C
{
    private int _x;

    public int X { get => _x; set => _x = value; }

    public void CopyTo(C obj)
    {
        obj._x = _x;
    }
}
";

// ---------------------------------------------------------------------------
// Happy paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_fix_rewrites_field_uses_and_property() {
    let (solution, ids) = solution_with(&[("C.cs", COPY_TO)]);
    let diagnostic = diagnostic(&solution, (ids[0], "_x;"), (ids[0], "X {"));

    let outcome = UseAutoPropertyCodeFix::new()
        .apply_fix(&solution, &diagnostic, &CancellationToken::new())
        .await
        .expect("fix applies");

    assert_eq!(outcome.path, SplicePath::SameDocument);
    assert_eq!(outcome.changed_documents, vec![ids[0]]);
    assert_eq!(
        text(&outcome.solution, ids[0]),
        "class C
{
    public int X { get; set; }

    public void CopyTo(C obj)
    {
        obj.X = X;
    }
}
"
    );
    assert_eq!(text(&solution, ids[0]), COPY_TO, "input solution untouched");
    assert_still_binds(&solution, &outcome.solution, "F:C._x", "P:C.X");
}

#[tokio::test]
async fn test_fix_follows_access_through_var_local() {
    let source = "class C\n{\n    private int _x;\n\n    public int X { get { return _x; } set { _x = value; } }\n\n    void M() { var c = new C(); c._x = 1; }\n}\n";
    let (solution, ids) = solution_with(&[("C.cs", source)]);
    let diagnostic = diagnostic(&solution, (ids[0], "_x;"), (ids[0], "X {"));

    let outcome = UseAutoPropertyCodeFix::new()
        .apply_fix(&solution, &diagnostic, &CancellationToken::new())
        .await
        .expect("fix applies");
    assert_eq!(
        text(&outcome.solution, ids[0]),
        "class C\n{\n    public int X { get; set; }\n\n    void M() { var c = new C(); c.X = 1; }\n}\n"
    );
    assert_still_binds(&solution, &outcome.solution, "F:C._x", "P:C.X");
}

#[tokio::test]
async fn test_fix_across_partial_documents() {
    let (solution, ids) = solution_with(&[
        (
            "C.Fields.cs",
            "partial class C\n{\n    private int _x;\n\n    public void Reset() { _x = 0; }\n}\n",
        ),
        (
            "C.Props.cs",
            "partial class C\n{\n    public int X { get { return _x; } set { _x = value; } }\n}\n",
        ),
    ]);
    let diagnostic = diagnostic(&solution, (ids[0], "_x;"), (ids[1], "X {"));

    let outcome = UseAutoPropertyCodeFix::new()
        .apply_fix(&solution, &diagnostic, &CancellationToken::new())
        .await
        .expect("fix applies");

    assert_eq!(outcome.path, SplicePath::CrossDocument);
    assert_eq!(outcome.changed_documents, ids);
    assert_eq!(
        text(&outcome.solution, ids[0]),
        "partial class C\n{\n    public void Reset() { X = 0; }\n}\n"
    );
    assert_eq!(
        text(&outcome.solution, ids[1]),
        "partial class C\n{\n    public int X { get; set; }\n}\n"
    );
    assert_still_binds(&solution, &outcome.solution, "F:C._x", "P:C.X");
}

#[tokio::test]
async fn test_fix_moves_initializer_by_default() {
    let source = "class C\n{\n    private int _x = 42;\n\n    public int X { get { return _x; } set { _x = value; } }\n}\n";
    let (solution, ids) = solution_with(&[("C.cs", source)]);
    let diagnostic = diagnostic(&solution, (ids[0], "_x ="), (ids[0], "X {"));

    let outcome = UseAutoPropertyCodeFix::new()
        .apply_fix(&solution, &diagnostic, &CancellationToken::new())
        .await
        .expect("fix applies");
    assert_eq!(
        text(&outcome.solution, ids[0]),
        "class C\n{\n    public int X { get; set; } = 42;\n}\n"
    );

    let outcome = UseAutoPropertyCodeFix::new()
        .with_options(FixOptions {
            move_initializer: false,
            ..FixOptions::default()
        })
        .apply_fix(&solution, &diagnostic, &CancellationToken::new())
        .await
        .expect("fix applies");
    assert_eq!(
        text(&outcome.solution, ids[0]),
        "class C\n{\n    public int X { get; set; }\n}\n"
    );
}

#[tokio::test]
async fn test_fix_keeps_sibling_declarator() {
    let source = "class C\n{\n    private int _a, _x;\n\n    public int X => _x;\n\n    int Sum() { return _a + _x; }\n}\n";
    let (solution, ids) = solution_with(&[("C.cs", source)]);
    let diagnostic = diagnostic(&solution, (ids[0], "_x;"), (ids[0], "X =>"));

    let outcome = UseAutoPropertyCodeFix::new()
        .apply_fix(&solution, &diagnostic, &CancellationToken::new())
        .await
        .expect("fix applies");
    assert_eq!(
        text(&outcome.solution, ids[0]),
        "class C\n{\n    private int _a;\n\n    public int X { get; }\n\n    int Sum() { return _a + X; }\n}\n"
    );
    assert_still_binds(&solution, &outcome.solution, "F:C._x", "P:C.X");
}

#[tokio::test]
async fn test_fix_keeps_unbalanced_directives() {
    let source = "class C\n{\n#if DEBUG\n    private int _x;\n#endif\n    public int X { get { return _x; } }\n}\n";
    let (solution, ids) = solution_with(&[("C.cs", source)]);
    let diagnostic = diagnostic(&solution, (ids[0], "_x;"), (ids[0], "X {"));

    let outcome = UseAutoPropertyCodeFix::new()
        .apply_fix(&solution, &diagnostic, &CancellationToken::new())
        .await
        .expect("fix applies");
    assert_eq!(
        text(&outcome.solution, ids[0]),
        "class C\n{\n#if DEBUG\n#endif\n    public int X { get; }\n}\n"
    );
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_genuine_conflict_aborts_the_fix() {
    let source = "class C\n{\n    private int _x;\n    public int X { get { return _x; } }\n    int M() { int X = 1; return X + _x; }\n}\n";
    let (solution, ids) = solution_with(&[("C.cs", source)]);
    let diagnostic = diagnostic(&solution, (ids[0], "_x;"), (ids[0], "X {"));

    let err = UseAutoPropertyCodeFix::new()
        .apply_fix(&solution, &diagnostic, &CancellationToken::new())
        .await
        .expect_err("the local X would capture the reference");
    let FixError::Rename(RenameError::Conflicts(conflicts)) = &err else {
        panic!("expected rename conflicts, got {err:?}");
    };
    assert_eq!(conflicts.len(), 1);
    let conflict: &RenameConflict = &conflicts[0];
    let keys: Vec<String> = conflict.candidates.iter().map(ToString::to_string).collect();
    assert!(
        keys.iter().all(|k| !k.starts_with("P:")),
        "bound to the local, not the property: {keys:?}"
    );
    assert!(!err.is_contract_violation());
    assert_eq!(text(&solution, ids[0]), source);
}

#[tokio::test]
async fn test_unresolved_field_access_aborts_the_fix() {
    let source = "class C\n{\n    private int _x;\n    public int X { get { return _x; } }\n    void M(Missing m) { m._x = 1; }\n}\n";
    let (solution, ids) = solution_with(&[("C.cs", source)]);
    let diagnostic = diagnostic(&solution, (ids[0], "_x;"), (ids[0], "X {"));

    let err = UseAutoPropertyCodeFix::new()
        .apply_fix(&solution, &diagnostic, &CancellationToken::new())
        .await
        .expect_err("m._x cannot be proven to be another member");
    let FixError::Rename(RenameError::Conflicts(conflicts)) = &err else {
        panic!("expected rename conflicts, got {err:?}");
    };
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].kind, ConflictKind::Unresolved);
    assert!(!err.is_contract_violation());
    assert_eq!(text(&solution, ids[0]), source);
}

#[tokio::test]
async fn test_cancelled_fix_reports_cancellation() {
    let (solution, ids) = solution_with(&[("C.cs", COPY_TO)]);
    let diagnostic = diagnostic(&solution, (ids[0], "_x;"), (ids[0], "X {"));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = UseAutoPropertyCodeFix::new()
        .apply_fix(&solution, &diagnostic, &cancel)
        .await
        .expect_err("cancelled");
    assert!(matches!(err, FixError::Cancelled));
}

#[tokio::test]
async fn test_field_and_property_in_different_projects() {
    let (solution, app) = Solution::new().with_project("app");
    let (solution, lib) = solution.with_project("lib");
    let (solution, fields) = solution
        .with_document(app, "Fields.cs", "partial class C { private int _x; }")
        .expect("add");
    let (solution, props) = solution
        .with_document(lib, "Props.cs", "partial class C { public int X { get { return 0; } } }")
        .expect("add");
    let diagnostic = diagnostic(&solution, (fields, "_x;"), (props, "X {"));

    let err = UseAutoPropertyCodeFix::new()
        .apply_fix(&solution, &diagnostic, &CancellationToken::new())
        .await
        .expect_err("projects differ");
    assert!(
        matches!(err, FixError::ProjectMismatch { field, property } if field == app && property == lib),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_field_location_on_a_method_is_rejected() {
    let (solution, ids) = solution_with(&[("C.cs", COPY_TO)]);
    let diagnostic = diagnostic(&solution, (ids[0], "CopyTo"), (ids[0], "X {"));

    let err = UseAutoPropertyCodeFix::new()
        .apply_fix(&solution, &diagnostic, &CancellationToken::new())
        .await
        .expect_err("not a field");
    assert!(matches!(err, FixError::UnexpectedSyntax { .. }), "got {err:?}");
    assert!(err.is_contract_violation());
}

// ---------------------------------------------------------------------------
// Injected services
// ---------------------------------------------------------------------------

/// Renames like the workspace, then drops the property.
struct DroppingRenamer {
    document: DocumentId,
}

#[async_trait]
impl SymbolRenamer for DroppingRenamer {
    async fn rename_symbol(
        &self,
        solution: &Solution,
        _symbol: &Symbol,
        _new_name: &str,
        _options: RenameOptions,
        _cancel: &CancellationToken,
    ) -> Result<Solution, RenameError> {
        Ok(solution.with_document_text(self.document, "class C\n{\n    private int _x;\n}\n")?)
    }
}

#[tokio::test]
async fn test_lost_property_after_rename_leaves_input_untouched() {
    let (solution, ids) = solution_with(&[("C.cs", COPY_TO)]);
    let diagnostic = diagnostic(&solution, (ids[0], "_x;"), (ids[0], "X {"));
    let fix = UseAutoPropertyCodeFix::with_services(
        Arc::new(WorkspaceServices::new()),
        Arc::new(DroppingRenamer { document: ids[0] }),
    );

    let err = fix
        .apply_fix(&solution, &diagnostic, &CancellationToken::new())
        .await
        .expect_err("property is gone");
    match &err {
        FixError::LostSymbol { role, key } => {
            assert_eq!(*role, SymbolRole::Property);
            assert_eq!(key.to_string(), "P:C.X");
        }
        other => panic!("expected LostSymbol, got {other:?}"),
    }
    assert!(err.is_contract_violation());
    assert_eq!(text(&solution, ids[0]), COPY_TO);
}

/// Records what the fix asks for, then delegates.
#[derive(Default)]
struct RecordingRenamer {
    inner: WorkspaceServices,
    calls: Mutex<Vec<(String, String, Vec<TextSpan>)>>,
}

#[async_trait]
impl SymbolRenamer for RecordingRenamer {
    async fn rename_symbol(
        &self,
        solution: &Solution,
        symbol: &Symbol,
        new_name: &str,
        options: RenameOptions,
        cancel: &CancellationToken,
    ) -> Result<Solution, RenameError> {
        let compilation = solution.compilation_for(DocumentId(0))?;
        let excluded = compilation
            .find_references(symbol)
            .into_iter()
            .filter(|location| {
                options
                    .location_filter
                    .as_ref()
                    .is_some_and(|filter| !filter(location))
            })
            .map(|location| location.span)
            .collect();
        self.calls.lock().expect("lock").push((
            symbol.key().to_string(),
            new_name.to_string(),
            excluded,
        ));
        self.inner
            .rename_symbol(solution, symbol, new_name, options, cancel)
            .await
    }
}

#[tokio::test]
async fn test_rename_excludes_only_the_field_declaration() {
    let (solution, ids) = solution_with(&[("C.cs", COPY_TO)]);
    let diagnostic = diagnostic(&solution, (ids[0], "_x;"), (ids[0], "X {"));
    let renamer = Arc::new(RecordingRenamer::default());
    let fix = UseAutoPropertyCodeFix::with_services(
        Arc::new(WorkspaceServices::new()),
        renamer.clone(),
    );

    fix.apply_fix(&solution, &diagnostic, &CancellationToken::new())
        .await
        .expect("fix applies");

    let calls = renamer.calls.lock().expect("lock");
    assert_eq!(calls.len(), 1);
    let (key, new_name, excluded) = &calls[0];
    assert_eq!(key, "F:C._x");
    assert_eq!(new_name, "X");
    let declaration = COPY_TO.find("_x;").expect("declaration") as u32;
    assert_eq!(excluded, &vec![TextSpan::at(declaration, 2)]);
}

// ---------------------------------------------------------------------------
// Registration and options
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_register_offers_action_for_its_diagnostic_only() {
    let (solution, ids) = solution_with(&[("C.cs", COPY_TO)]);
    let fix = UseAutoPropertyCodeFix::new();
    assert_eq!(fix.fixable_diagnostic_ids(), &[USE_AUTO_PROPERTY_ID]);

    let mut diagnostic = diagnostic(&solution, (ids[0], "_x;"), (ids[0], "X {"));
    let action = fix.register(&diagnostic).expect("offered");
    assert_eq!(action.title, USE_AUTO_PROPERTY_TITLE);
    assert_eq!(action.equivalence_key, diagnostic.equivalence_key);

    diagnostic.id = "PF0001".to_string();
    assert!(fix.register(&diagnostic).is_none());
    let err = fix
        .apply_fix(&solution, &diagnostic, &CancellationToken::new())
        .await
        .expect_err("not ours");
    assert!(matches!(err, FixError::UnsupportedDiagnostic(ref id) if id == "PF0001"));
}

#[test]
fn test_fix_options_deserialize_with_defaults() {
    let options: FixOptions = serde_json::from_str("{}").expect("empty object");
    assert_eq!(options, FixOptions::default());
    assert!(options.move_initializer && options.format);

    let options: FixOptions =
        serde_json::from_str(r#"{ "moveInitializer": false }"#).expect("partial object");
    assert!(!options.move_initializer);
    assert!(options.format);
}

#[test]
fn test_diagnostic_round_trips_through_json() {
    let diagnostic = Diagnostic::use_auto_property(
        Location::new(DocumentId(1), TextSpan::new(10, 11)),
        Location::new(DocumentId(0), TextSpan::new(4, 6)),
    );
    let json = serde_json::to_value(&diagnostic).expect("serialize");
    assert_eq!(json["id"], USE_AUTO_PROPERTY_ID);
    assert_eq!(json["fieldLocation"]["span"]["start"], 4);
    let back: Diagnostic = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, diagnostic);
}
