//! Tracing setup for the propfix binary.
//!
//! `PROPFIX_LOG_FORMAT` picks the output:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: indented spans via `tracing-tree`, handy for following one fix
//!   through its stages
//! - `json`: one JSON object per event
//!
//! ```bash
//! PROPFIX_LOG=debug PROPFIX_LOG_FORMAT=tree propfix --property C.cs:5:16 --field C.cs:3:17
//! PROPFIX_LOG="propfix_workspace=trace" propfix ...
//! ```
//!
//! A bare `PROPFIX_LOG` level applies to the propfix crates only. Nothing is
//! installed unless `PROPFIX_LOG` or `RUST_LOG` is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("PROPFIX_LOG_FORMAT").unwrap_or_default())
    }
}

const PROPFIX_TARGETS: &[&str] = &[
    "propfix",
    "propfix_cli",
    "propfix_codefix",
    "propfix_workspace",
    "propfix_semantic",
    "propfix_syntax",
];

/// Expand a bare level (`debug`) to that level for the propfix crates and
/// `warn` for everything else. Anything with a target or a list passes
/// through unchanged.
pub fn filter_directives(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() || value.contains(['=', ',']) {
        return value.to_string();
    }
    let mut directives = vec!["warn".to_string()];
    directives.extend(PROPFIX_TARGETS.iter().map(|target| format!("{target}={value}")));
    directives.join(",")
}

/// `PROPFIX_LOG` takes precedence over `RUST_LOG`, which is used as-is.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("PROPFIX_LOG") {
        EnvFilter::builder().parse_lossy(filter_directives(&val))
    } else {
        EnvFilter::from_default_env()
    }
}

/// Install the global subscriber. Output goes to stderr so stdout stays
/// clean for the fixed source or `--json`.
pub fn init_tracing() {
    let has_propfix_log = std::env::var("PROPFIX_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_propfix_log && !has_rust_log {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
