use std::path::PathBuf;

use super::driver::{ChangedFile, FixReport};
use super::reporter::Reporter;
use propfix_codefix::SplicePath;

fn report(changed: Vec<ChangedFile>) -> FixReport {
    FixReport {
        splice_path: SplicePath::CrossDocument,
        changed,
    }
}

#[test]
fn renders_each_file_under_a_header() {
    let report = report(vec![
        ChangedFile {
            path: PathBuf::from("A.cs"),
            text: "class A { }\n".to_string(),
        },
        ChangedFile {
            path: PathBuf::from("B.cs"),
            text: "class B { }".to_string(),
        },
    ]);
    assert_eq!(
        Reporter::new(false).render(&report),
        "==> A.cs <==\nclass A { }\n\n==> B.cs <==\nclass B { }\n"
    );
}

#[test]
fn renders_no_changes() {
    assert_eq!(Reporter::new(false).render(&report(Vec::new())), "no changes\n");
}

#[test]
fn summary_names_the_path() {
    let report = report(vec![
        ChangedFile {
            path: PathBuf::from("A.cs"),
            text: String::new(),
        },
        ChangedFile {
            path: PathBuf::from("B.cs"),
            text: String::new(),
        },
    ]);
    assert_eq!(
        Reporter::new(false).summary(&report),
        "updated 2 files (field and property in separate files)"
    );
}

#[test]
fn color_only_when_asked() {
    let report = report(vec![ChangedFile {
        path: PathBuf::from("A.cs"),
        text: "x\n".to_string(),
    }]);
    colored::control::set_override(true);
    let colored = Reporter::new(true).render(&report);
    colored::control::unset_override();
    assert!(colored.contains("\u{1b}["), "ANSI escapes expected: {colored:?}");
    assert!(!Reporter::new(false).render(&report).contains('\u{1b}'));
}
