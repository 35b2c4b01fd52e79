//! Tests for the individual stages of the fix.

use propfix_codefix::{
    Diagnostic, FixError, FixOptions, Located, Location, SplicePath, WorkspaceServices,
};
use propfix_common::{DocumentId, TextSpan};
use propfix_syntax::SyntaxKind;
use propfix_workspace::{CancellationToken, Solution};

const SOURCE: &str = "class C
{
    private int _x;

    public int X
    {
        get { return _x; }
        private set { _x = value; }
    }

    public void Twice() { _x = _x * 2; }
}
";

fn setup() -> (Solution, DocumentId, Diagnostic) {
    let (solution, project) = Solution::new().with_project("app");
    let (solution, document) = solution
        .with_document(project, "C.cs", SOURCE)
        .expect("add document");
    let at = |needle: &str, len: u32| {
        let start = SOURCE.find(needle).expect("needle") as u32;
        Location::new(document, TextSpan::at(start, len))
    };
    let diagnostic = Diagnostic::use_auto_property(at("X\n", 1), at("_x;", 2));
    (solution, document, diagnostic)
}

#[tokio::test]
async fn test_stages_run_in_order() {
    let (solution, document, diagnostic) = setup();
    let services = WorkspaceServices::new();
    let cancel = CancellationToken::new();

    let located = Located::locate(&services, &solution, &diagnostic, &cancel)
        .await
        .expect("locate");
    assert_eq!(located.field().symbol.key().to_string(), "F:C._x");
    assert_eq!(located.property().symbol.key().to_string(), "P:C.X");
    let original_tree = solution.document(document).expect("document").tree().id();
    assert_eq!(located.field().node.tree, original_tree);

    let renamed = located.rename(&services, &cancel).await.expect("rename");
    let renamed_text = renamed
        .solution()
        .document(document)
        .expect("document")
        .text()
        .to_string();
    assert!(renamed_text.contains("private int _x;"), "declaration kept");
    assert!(renamed_text.contains("get { return X; }"));
    assert!(renamed_text.contains("private set { X = value; }"));
    assert!(renamed_text.contains("X = X * 2;"));
    assert!(renamed.solution().version() > solution.version());

    let reresolved = renamed.reresolve(&services, &cancel).await.expect("reresolve");
    let renamed_tree = reresolved.field().node.tree;
    assert_ne!(renamed_tree, original_tree, "node ids belong to the renamed tree");
    assert_eq!(reresolved.property().node.tree, renamed_tree);

    let spliced = reresolved.splice(&FixOptions::default()).expect("splice");
    assert_eq!(spliced.path, SplicePath::SameDocument);
    assert_eq!(
        spliced.solution.document(document).expect("document").text(),
        "class C
{
    public int X
    {
        get;
        private set;
    }

    public void Twice() { X = X * 2; }
}
"
    );
    assert_eq!(solution.document(document).expect("document").text(), SOURCE);
}

#[tokio::test]
async fn test_locate_rejects_swapped_locations() {
    let (solution, _, diagnostic) = setup();
    let swapped =
        Diagnostic::use_auto_property(diagnostic.field_location, diagnostic.property_location);

    let err = Located::locate(
        &WorkspaceServices::new(),
        &solution,
        &swapped,
        &CancellationToken::new(),
    )
    .await
    .expect_err("field location points at the property");
    assert!(
        matches!(
            err,
            FixError::UnexpectedSyntax {
                expected: SyntaxKind::VariableDeclarator,
                ..
            }
        ),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_locate_rejects_unknown_document() {
    let (solution, _, mut diagnostic) = setup();
    diagnostic.property_location.document = DocumentId(42);
    let err = Located::locate(
        &WorkspaceServices::new(),
        &solution,
        &diagnostic,
        &CancellationToken::new(),
    )
    .await
    .expect_err("no such document");
    assert!(matches!(err, FixError::MissingDocument(DocumentId(42))));
}

#[tokio::test]
async fn test_cancellation_between_stages() {
    let (solution, _, diagnostic) = setup();
    let services = WorkspaceServices::new();
    let cancel = CancellationToken::new();

    let located = Located::locate(&services, &solution, &diagnostic, &cancel)
        .await
        .expect("locate");
    cancel.cancel();
    let err = located
        .rename(&services, &cancel)
        .await
        .expect_err("cancelled before rename");
    assert!(matches!(err, FixError::Cancelled));
    assert!(!err.is_contract_violation());
}
