//! Runs the CLI driver against files on disk.

use clap::Parser;
use propfix_cli::args::CliArgs;
use propfix_cli::config::resolve_config;
use propfix_cli::driver::{self, FixRequest};
use propfix_codefix::{FixOptions, SplicePath};
use propfix_workspace::CancellationToken;
use std::path::Path;
use tempfile::TempDir;

const SOURCE: &str = "class C
{
    private int _x = 3;

    public int X { get => _x; set => _x = value; }

    public void CopyTo(C obj)
    {
        obj._x = _x;
    }
}
";

fn project(files: &[(&str, &str)]) -> TempDir {
    let temp = tempfile::tempdir().expect("temp dir");
    for (name, text) in files {
        std::fs::write(temp.path().join(name), text).expect("write source");
    }
    temp
}

fn request(cwd: &Path, argv: &[&str]) -> FixRequest {
    let mut full = vec!["propfix"];
    full.extend_from_slice(argv);
    let args = CliArgs::try_parse_from(full).expect("args should parse");
    let config = resolve_config(&args, cwd).expect("config");
    FixRequest::from_args(&args, &config, cwd)
}

#[tokio::test]
async fn fixes_a_single_file() {
    let temp = project(&[("C.cs", SOURCE)]);
    let request = request(
        temp.path(),
        &["--property", "C.cs:5:16", "--field", "C.cs:3:17"],
    );

    let report = driver::run(&request, &CancellationToken::new())
        .await
        .expect("fix applies");
    assert_eq!(report.splice_path, SplicePath::SameDocument);
    assert_eq!(report.changed.len(), 1);
    assert_eq!(report.changed[0].path, temp.path().join("C.cs"));
    assert_eq!(
        report.changed[0].text,
        "class C
{
    public int X { get; set; } = 3;

    public void CopyTo(C obj)
    {
        obj.X = X;
    }
}
"
    );
    let on_disk = std::fs::read_to_string(temp.path().join("C.cs")).expect("read");
    assert_eq!(on_disk, SOURCE, "nothing written without --write");
}

#[tokio::test]
async fn writes_both_partial_files() {
    let temp = project(&[
        (
            "C.Fields.cs",
            "partial class C\n{\n    private int _x;\n}\n",
        ),
        (
            "C.Props.cs",
            "partial class C\n{\n    public int X { get { return _x; } }\n}\n",
        ),
    ]);
    let request = request(
        temp.path(),
        &[
            "--property",
            "C.Props.cs:3:16",
            "--field",
            "./C.Fields.cs:3:17",
            "C.Fields.cs",
        ],
    );
    assert_eq!(request.files.len(), 2, "same file named twice loads once");

    let report = driver::run(&request, &CancellationToken::new())
        .await
        .expect("fix applies");
    assert_eq!(report.splice_path, SplicePath::CrossDocument);
    driver::write_changes(&report).expect("write");

    let read = |name: &str| std::fs::read_to_string(temp.path().join(name)).expect("read");
    assert_eq!(read("C.Fields.cs"), "partial class C\n{\n}\n");
    assert_eq!(
        read("C.Props.cs"),
        "partial class C\n{\n    public int X { get; }\n}\n"
    );
}

#[tokio::test]
async fn config_file_options_apply() {
    let temp = project(&[
        ("C.cs", SOURCE),
        ("propfix.json", "{ fix: { moveInitializer: false } }"),
    ]);
    let request = request(
        temp.path(),
        &["--property", "C.cs:5:16", "--field", "C.cs:3:17"],
    );
    assert_eq!(
        request.options,
        FixOptions {
            move_initializer: false,
            format: true,
        }
    );

    let report = driver::run(&request, &CancellationToken::new())
        .await
        .expect("fix applies");
    assert!(report.changed[0].text.contains("public int X { get; set; }\n"));
    assert!(!report.changed[0].text.contains("= 3"));
}

#[tokio::test]
async fn conflicts_are_listed_per_file() {
    let source = "class C\n{\n    private int _x;\n    public int X { get { return _x; } }\n    int M() { int X = 1; return X + _x; }\n}\n";
    let temp = project(&[("C.cs", source)]);
    let request = request(
        temp.path(),
        &["--property", "C.cs:4:16", "--field", "C.cs:3:17"],
    );

    let err = driver::run(&request, &CancellationToken::new())
        .await
        .expect_err("local X captures the reference");
    let message = err.to_string();
    assert!(message.contains("would change what existing code refers to"), "{message}");
    assert!(message.contains("C.cs: reference conflict"), "{message}");
}

#[tokio::test]
async fn position_outside_the_file_is_reported() {
    let temp = project(&[("C.cs", SOURCE)]);
    let request = request(
        temp.path(),
        &["--property", "C.cs:99:1", "--field", "C.cs:3:17"],
    );
    let err = driver::run(&request, &CancellationToken::new())
        .await
        .expect_err("no line 99");
    assert!(err.to_string().contains("past the end of the file"), "{err}");
}

#[tokio::test]
async fn missing_source_file_is_reported() {
    let temp = project(&[]);
    let request = request(
        temp.path(),
        &["--property", "Nope.cs:1:1", "--field", "Nope.cs:1:1"],
    );
    let err = driver::run(&request, &CancellationToken::new())
        .await
        .expect_err("file does not exist");
    assert!(err.to_string().contains("failed to read source file"), "{err}");
}
