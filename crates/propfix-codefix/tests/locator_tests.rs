use super::*;
use propfix_common::ProjectId;
use propfix_syntax::parse;
use std::sync::Arc;

const SOURCE: &str = r#"class C
{
    private int _a, _x;
    public int X { get { return _x; } }
    void M() { int local = 0; }
}
"#;

fn compile() -> Compilation {
    Compilation::build(ProjectId(0), [(DocumentId(0), Arc::new(parse(SOURCE)))])
}

/// A hint on the identifier `needle` starts with.
fn at(needle: &str) -> Location {
    let start = SOURCE
        .find(needle)
        .unwrap_or_else(|| panic!("no {needle} in source"));
    let len = needle
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .count();
    Location::new(DocumentId(0), TextSpan::at(start as u32, len as u32))
}

#[test]
fn test_locate_field_declarator() {
    let compilation = compile();
    let field = locate_field(&compilation, &at("_x;")).expect("field");
    assert_eq!(field.role, SymbolRole::Field);
    assert_eq!(field.symbol.key().to_string(), "F:C._x");
    assert_eq!(field.span.slice(SOURCE), Some("_x"));
    let tree = compilation.tree(DocumentId(0)).expect("tree");
    assert_eq!(
        tree.node(field.node).map(|n| n.kind()),
        Some(SyntaxKind::VariableDeclarator)
    );
}

#[test]
fn test_locate_property_from_any_token_inside() {
    let compilation = compile();
    for hint in ["X {", "get", "return"] {
        let property = locate_property(&compilation, &at(hint)).expect("property");
        assert_eq!(property.symbol.key().to_string(), "P:C.X", "hint {hint:?}");
        assert_eq!(
            property.span.slice(SOURCE),
            Some("public int X { get { return _x; } }")
        );
    }
}

#[test]
fn test_field_hint_on_property_is_unexpected_syntax() {
    let compilation = compile();
    let err = locate_field(&compilation, &at("X {")).expect_err("not a declarator");
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
    assert!(err.is_contract_violation());
}

#[test]
fn test_local_declarator_is_not_a_field() {
    let compilation = compile();
    let err = locate_field(&compilation, &at("local")).expect_err("local, not field");
    assert!(
        matches!(
            err,
            FixError::MissingSymbol {
                role: SymbolRole::Field,
                ..
            }
        ),
        "got {err:?}"
    );
}

#[test]
fn test_unknown_document() {
    let compilation = compile();
    let location = Location::new(DocumentId(9), TextSpan::at(0, 1));
    let err = locate_property(&compilation, &location).expect_err("no such document");
    assert!(matches!(err, FixError::MissingDocument(DocumentId(9))));
}
