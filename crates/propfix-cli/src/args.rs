use clap::Parser;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A `file:line:column` position, 1-based as editors show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePosition {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
}

impl FromStr for SourcePosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Split from the right so Windows drive letters survive.
        let mut parts = s.rsplitn(3, ':');
        let (Some(column), Some(line), Some(file)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("expected <file>:<line>:<column>, got `{s}`"));
        };
        if file.is_empty() {
            return Err(format!("missing file name in `{s}`"));
        }
        let number = |text: &str, what: &str| match text.parse::<u32>() {
            Ok(0) | Err(_) => Err(format!("{what} must be a positive number, got `{text}`")),
            Ok(n) => Ok(n),
        };
        Ok(SourcePosition {
            file: PathBuf::from(file),
            line: number(line, "line")?,
            column: number(column, "column")?,
        })
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// CLI arguments for the propfix binary.
#[derive(Parser, Debug)]
#[command(
    name = "propfix",
    version,
    about = "Turn a field-backed property into an auto-property"
)]
pub struct CliArgs {
    /// Position inside the property declaration, as `file:line:column`.
    #[arg(long)]
    pub property: SourcePosition,

    /// Position on the backing field's name, as `file:line:column`.
    #[arg(long)]
    pub field: SourcePosition,

    /// Write changed files back to disk instead of printing them.
    #[arg(short = 'w', long)]
    pub write: bool,

    /// Print the result as JSON.
    #[arg(long, conflicts_with = "write")]
    pub json: bool,

    /// Path to propfix.json. Defaults to the nearest one above the current directory.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Do not tidy blank lines left behind by the removed field.
    #[arg(long = "no-format")]
    pub no_format: bool,

    /// Drop the field's initializer instead of moving it to the property.
    #[arg(long = "no-move-initializer")]
    pub no_move_initializer: bool,

    /// Additional source files of the project. Files named by `--property`
    /// and `--field` are always included.
    pub files: Vec<PathBuf>,
}
