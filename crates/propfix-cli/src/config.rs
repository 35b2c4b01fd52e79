//! `propfix.json` loading.
//!
//! The file is JSON5, so comments and trailing commas are fine:
//!
//! ```json5
//! {
//!   // applied to every run from this directory down
//!   fix: { moveInitializer: false },
//!   files: ["src/Shared.cs"],
//! }
//! ```

use anyhow::{Context, Result};
use propfix_codefix::FixOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::args::CliArgs;

pub const CONFIG_FILE_NAME: &str = "propfix.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropfixConfig {
    pub fix: FixOptions,
    /// Extra project files, relative to the config file.
    pub files: Vec<PathBuf>,
}

pub fn parse_config(source: &str) -> Result<PropfixConfig> {
    json5::from_str(source).context("failed to parse propfix.json")
}

/// Read and parse `path`. Relative `files` entries are resolved against the
/// directory holding the config.
pub fn load_config(path: &Path) -> Result<PropfixConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let mut config = parse_config(&source)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;
    if let Some(base) = path.parent() {
        for file in &mut config.files {
            if file.is_relative() {
                *file = base.join(&*file);
            }
        }
    }
    debug!(path = %path.display(), files = config.files.len(), "loaded config");
    Ok(config)
}

/// The nearest `propfix.json` in `start` or one of its ancestors.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Config from `--config`, else the nearest one above `cwd`, else defaults.
pub fn resolve_config(args: &CliArgs, cwd: &Path) -> Result<PropfixConfig> {
    let path = match &args.config {
        Some(path) => Some(cwd.join(path)),
        None => find_config(cwd),
    };
    match path {
        Some(path) => load_config(&path),
        None => Ok(PropfixConfig::default()),
    }
}

/// Command-line switches win over the config file.
pub fn resolve_fix_options(config: &PropfixConfig, args: &CliArgs) -> FixOptions {
    let mut options = config.fix;
    if args.no_format {
        options.format = false;
    }
    if args.no_move_initializer {
        options.move_initializer = false;
    }
    options
}
