use clap::Parser;
use std::path::PathBuf;

use super::args::{CliArgs, SourcePosition};

#[test]
fn parses_positions_and_flags() {
    let args = CliArgs::try_parse_from([
        "propfix",
        "--property",
        "src/C.cs:5:16",
        "--field",
        "src/C.cs:3:17",
        "--write",
        "--no-format",
        "src/D.cs",
    ])
    .expect("args should parse");

    assert_eq!(
        args.property,
        SourcePosition {
            file: PathBuf::from("src/C.cs"),
            line: 5,
            column: 16,
        }
    );
    assert_eq!(args.field.line, 3);
    assert!(args.write);
    assert!(args.no_format);
    assert!(!args.no_move_initializer);
    assert!(args.config.is_none());
    assert_eq!(args.files, vec![PathBuf::from("src/D.cs")]);
}

#[test]
fn positions_are_required() {
    assert!(CliArgs::try_parse_from(["propfix", "--field", "C.cs:1:1"]).is_err());
}

#[test]
fn json_and_write_are_exclusive() {
    let result = CliArgs::try_parse_from([
        "propfix",
        "--property",
        "C.cs:1:1",
        "--field",
        "C.cs:1:1",
        "--json",
        "--write",
    ]);
    assert!(result.is_err());
}

#[test]
fn source_position_keeps_colons_in_file_name() {
    let position: SourcePosition = "C:/src/C.cs:12:4".parse().expect("drive letter path");
    assert_eq!(position.file, PathBuf::from("C:/src/C.cs"));
    assert_eq!((position.line, position.column), (12, 4));
    assert_eq!(position.to_string(), "C:/src/C.cs:12:4");
}

#[test]
fn source_position_rejects_bad_input() {
    for input in ["C.cs", "C.cs:3", ":3:4", "C.cs:0:1", "C.cs:1:x"] {
        assert!(
            input.parse::<SourcePosition>().is_err(),
            "{input:?} should not parse"
        );
    }
}
