//! Stable, position-independent symbol keys.
//!
//! A key names a symbol by its kind and container path, never by tree
//! position, so it survives edits elsewhere in the solution and can be
//! resolved against any later compilation. Display forms:
//!
//! | kind      | example            |
//! |-----------|--------------------|
//! | namespace | `N:Outer.Inner`    |
//! | type      | `T:N.C`            |
//! | field     | `F:N.C._x`         |
//! | property  | `P:N.C.X`          |
//! | method    | `M:N.C.M(2)`       |
//! | parameter | `A:N.C.M(1).p`     |
//! | local     | `L:N.C.M(0).x#0`   |

use crate::compilation::Compilation;
use crate::symbol::{Symbol, SymbolKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SymbolKey {
    kind: SymbolKind,
    path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolKeyParseError(String);

impl fmt::Display for SymbolKeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed symbol key `{}`", self.0)
    }
}

impl std::error::Error for SymbolKeyParseError {}

impl SymbolKey {
    pub fn new(kind: SymbolKind, path: impl Into<String>) -> Self {
        SymbolKey {
            kind,
            path: path.into(),
        }
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// Container path plus name, without the kind prefix.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Key of a symbol named `name` inside the symbol keyed by `self`.
    pub fn child(&self, kind: SymbolKind, name: &str) -> SymbolKey {
        if self.path.is_empty() {
            SymbolKey::new(kind, name)
        } else {
            SymbolKey::new(kind, format!("{}.{}", self.path, name))
        }
    }

    /// The same key with its last name segment replaced.
    ///
    /// Used to predict the key a symbol will have after a rename. Method and
    /// local suffixes (`(2)`, `#0`) are kept.
    pub fn renamed(&self, new_name: &str) -> SymbolKey {
        let (prefix, last) = match self.path.rfind('.') {
            Some(dot) => (&self.path[..=dot], &self.path[dot + 1..]),
            None => ("", self.path.as_str()),
        };
        let suffix_at = last.find(['(', '#']).unwrap_or(last.len());
        SymbolKey::new(
            self.kind,
            format!("{prefix}{new_name}{}", &last[suffix_at..]),
        )
    }

    /// Find the symbol this key names in `compilation`.
    pub fn resolve(&self, compilation: &Compilation) -> Option<Symbol> {
        compilation.symbol_by_key(self)
    }

    fn prefix(kind: SymbolKind) -> char {
        match kind {
            SymbolKind::Namespace => 'N',
            SymbolKind::NamedType => 'T',
            SymbolKind::Field => 'F',
            SymbolKind::Property => 'P',
            SymbolKind::Method => 'M',
            SymbolKind::Parameter => 'A',
            SymbolKind::Local => 'L',
        }
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", SymbolKey::prefix(self.kind), self.path)
    }
}

impl FromStr for SymbolKey {
    type Err = SymbolKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SymbolKeyParseError(s.to_string());
        let (prefix, path) = s.split_once(':').ok_or_else(malformed)?;
        let kind = match prefix {
            "N" => SymbolKind::Namespace,
            "T" => SymbolKind::NamedType,
            "F" => SymbolKind::Field,
            "P" => SymbolKind::Property,
            "M" => SymbolKind::Method,
            "A" => SymbolKind::Parameter,
            "L" => SymbolKind::Local,
            _ => return Err(malformed()),
        };
        if path.is_empty() {
            return Err(malformed());
        }
        Ok(SymbolKey::new(kind, path))
    }
}

impl TryFrom<String> for SymbolKey {
    type Error = SymbolKeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SymbolKey> for String {
    fn from(key: SymbolKey) -> String {
        key.to_string()
    }
}

#[cfg(test)]
#[path = "../tests/key_tests.rs"]
mod key_tests;
