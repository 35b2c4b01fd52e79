use super::*;

fn directive(kind: DirectiveKind, text: &str) -> Trivia {
    Trivia::new(TriviaKind::Directive(kind), text)
}

#[test]
fn test_balanced_if_endif_is_dropped() {
    let trivia = [
        directive(DirectiveKind::If, "#if A\n"),
        Trivia::whitespace("    "),
        directive(DirectiveKind::EndIf, "#endif\n"),
    ];
    let refs: Vec<&Trivia> = trivia.iter().collect();
    assert!(unbalanced_directives(&refs).is_empty());
}

#[test]
fn test_open_if_group_keeps_all_its_branches() {
    let trivia = [
        directive(DirectiveKind::If, "#if A\n"),
        directive(DirectiveKind::Else, "#else\n"),
    ];
    let refs: Vec<&Trivia> = trivia.iter().collect();
    assert_eq!(unbalanced_directives(&refs), vec![0, 1]);
}

#[test]
fn test_stray_closers_are_unbalanced() {
    let trivia = [
        directive(DirectiveKind::EndIf, "#endif\n"),
        directive(DirectiveKind::Region, "#region R\n"),
        directive(DirectiveKind::EndRegion, "#endregion\n"),
        directive(DirectiveKind::EndRegion, "#endregion\n"),
    ];
    let refs: Vec<&Trivia> = trivia.iter().collect();
    assert_eq!(unbalanced_directives(&refs), vec![0, 3]);
}

#[test]
fn test_other_directives_never_count() {
    let trivia = [
        directive(DirectiveKind::Other, "#pragma warning disable\n"),
        directive(DirectiveKind::Region, "#region R\n"),
    ];
    let refs: Vec<&Trivia> = trivia.iter().collect();
    assert_eq!(unbalanced_directives(&refs), vec![1]);
}

#[test]
fn test_remove_options_compose() {
    let options = RemoveOptions::KEEP_UNBALANCED_DIRECTIVES | RemoveOptions::ADD_ELASTIC_MARKER;
    assert!(options.contains(RemoveOptions::ADD_ELASTIC_MARKER));
    assert!(!options.contains(RemoveOptions::KEEP_LEADING_TRIVIA));
    assert!(RemoveOptions::KEEP_EXTERIOR_TRIVIA.contains(RemoveOptions::KEEP_TRAILING_TRIVIA));
}
