//! Symbol rename across a solution, with conflict detection.
//!
//! The engine rewrites every reference the location filter keeps, rebinds
//! the result and checks that each renamed identifier still means what it
//! meant before. Callers can override that check per reference with a
//! `ConflictPredicate`.

use crate::error::SolutionError;
use crate::solution::Solution;
use indexmap::IndexMap;
use propfix_common::{DocumentId, TextSpan};
use propfix_semantic::{Compilation, ReferenceLocation, Symbol, SymbolKey};
use propfix_syntax::kind::is_valid_identifier;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Outcome of a conflict predicate for one renamed reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictResolution {
    NoConflict,
    Conflict,
    /// Fall back to the engine's own analysis.
    UseDefault,
}

/// Classifies the symbols a renamed identifier binds to after the rename.
///
/// `compilation` is the post-rename compilation the candidates belong to.
pub trait ConflictPredicate: Send + Sync {
    fn resolve(&self, candidates: &[Symbol], compilation: &Compilation) -> ConflictResolution;
}

impl<F> ConflictPredicate for F
where
    F: Fn(&[Symbol], &Compilation) -> ConflictResolution + Send + Sync,
{
    fn resolve(&self, candidates: &[Symbol], compilation: &Compilation) -> ConflictResolution {
        self(candidates, compilation)
    }
}

/// Keeps a reference in the rename when it returns true.
pub type LocationFilter = Arc<dyn Fn(&ReferenceLocation) -> bool + Send + Sync>;

#[derive(Clone, Default)]
pub struct RenameOptions {
    pub location_filter: Option<LocationFilter>,
    pub conflict_predicate: Option<Arc<dyn ConflictPredicate>>,
}

impl RenameOptions {
    pub fn with_location_filter(
        mut self,
        filter: impl Fn(&ReferenceLocation) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.location_filter = Some(Arc::new(filter));
        self
    }

    pub fn with_conflict_predicate(mut self, predicate: impl ConflictPredicate + 'static) -> Self {
        self.conflict_predicate = Some(Arc::new(predicate));
        self
    }

    fn keeps(&self, location: &ReferenceLocation) -> bool {
        self.location_filter
            .as_ref()
            .is_none_or(|filter| filter(location))
    }
}

impl fmt::Debug for RenameOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenameOptions")
            .field("location_filter", &self.location_filter.is_some())
            .field("conflict_predicate", &self.conflict_predicate.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictKind {
    /// A renamed reference binds to something else, or to several symbols.
    Reference,
    /// The containing type already has a member with the new name.
    Declaration,
    /// A name spelled like the symbol that binds to nothing, or to several
    /// symbols. It might refer to the symbol and would not be renamed.
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameConflict {
    pub kind: ConflictKind,
    pub document: DocumentId,
    /// Span in the renamed text. Unresolved names are reported before any
    /// rewrite, so theirs is in the original text.
    pub span: TextSpan,
    /// What the identifier binds to after the rename.
    pub candidates: Vec<SymbolKey>,
}

impl fmt::Display for RenameConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            ConflictKind::Reference => "reference",
            ConflictKind::Declaration => "declaration",
            ConflictKind::Unresolved => "unresolved name",
        };
        write!(f, "{what} conflict at {}{}", self.document, self.span)?;
        if !self.candidates.is_empty() {
            let keys: Vec<String> = self.candidates.iter().map(ToString::to_string).collect();
            write!(f, " (binds to {})", keys.join(", "))?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenameError {
    #[error("`{0}` is not a valid identifier")]
    InvalidName(String),

    #[error("symbol `{0}` is not declared in the solution")]
    UnknownSymbol(SymbolKey),

    #[error("rename would introduce {} conflict(s)", .0.len())]
    Conflicts(Vec<RenameConflict>),

    #[error("rename cancelled")]
    Cancelled,

    #[error(transparent)]
    Solution(#[from] SolutionError),
}

// ---------------------------------------------------------------------------
// RenameEngine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct RenameEngine;

/// A renamed location in the rewritten text.
struct Renamed {
    document: DocumentId,
    span: TextSpan,
    is_declaration: bool,
}

impl RenameEngine {
    pub fn new() -> Self {
        RenameEngine
    }

    /// Rename `symbol` to `new_name` and return the resulting solution.
    ///
    /// `symbol` may come from an older compilation; it is re-resolved by key
    /// against `solution` first.
    pub fn rename_symbol(
        &self,
        solution: &Solution,
        symbol: &Symbol,
        new_name: &str,
        options: &RenameOptions,
        cancel: &CancellationToken,
    ) -> Result<Solution, RenameError> {
        if !is_valid_identifier(new_name) {
            return Err(RenameError::InvalidName(new_name.to_string()));
        }
        check_cancelled(cancel)?;

        let unknown = || RenameError::UnknownSymbol(symbol.key().clone());
        let declaration = symbol.first_declaration().ok_or_else(unknown)?;
        let project = solution
            .project_of(declaration.document)
            .ok_or_else(unknown)?;
        let compilation = solution.compilation(project)?;
        let symbol = symbol.key().resolve(&compilation).ok_or_else(unknown)?;
        if symbol.name() == new_name {
            return Ok(solution.clone());
        }

        let unresolved: Vec<RenameConflict> = compilation
            .unresolved_references(symbol.name())
            .into_iter()
            .map(|location| RenameConflict {
                kind: ConflictKind::Unresolved,
                document: location.document,
                span: location.span,
                candidates: Vec::new(),
            })
            .collect();
        if !unresolved.is_empty() {
            for conflict in &unresolved {
                warn!(%conflict, "rename conflict");
            }
            return Err(RenameError::Conflicts(unresolved));
        }

        let mut by_document: IndexMap<DocumentId, Vec<ReferenceLocation>> = IndexMap::new();
        for location in compilation.find_references(&symbol) {
            if options.keeps(&location) {
                by_document.entry(location.document).or_default().push(location);
            } else {
                trace!(document = %location.document, span = %location.span, "reference filtered out");
            }
        }

        let mut next = solution.clone();
        let mut renamed = Vec::new();
        for (document, locations) in &by_document {
            check_cancelled(cancel)?;
            let current = next
                .document(*document)
                .ok_or(SolutionError::UnknownDocument(*document))?;
            let spans: Vec<TextSpan> = locations.iter().map(|l| l.span).collect();
            let (text, new_spans) = rewrite(current.text(), &spans, new_name);
            renamed.extend(locations.iter().zip(new_spans).filter_map(|(location, span)| {
                Some(Renamed {
                    document: *document,
                    span: span?,
                    is_declaration: location.is_declaration,
                })
            }));
            next = next.with_document_text(*document, &text)?;
        }
        check_cancelled(cancel)?;

        let declaration_renamed = renamed.iter().any(|r| r.is_declaration);
        let mut conflicts = Vec::new();
        if declaration_renamed {
            conflicts.extend(declaration_conflicts(&compilation, &symbol, new_name, &renamed));
        }

        let new_compilation = next.compilation(project)?;
        let expected_key = if declaration_renamed {
            symbol.key().renamed(new_name)
        } else {
            symbol.key().clone()
        };
        let expected = new_compilation.symbol_by_key(&expected_key);

        for location in renamed.iter().filter(|r| !r.is_declaration) {
            let candidates = new_compilation
                .tree(location.document)
                .and_then(|tree| tree.token_at_offset(location.span.start))
                .filter(|token| token.span() == location.span)
                .map(|token| new_compilation.bound_symbols(token.id()))
                .unwrap_or_default();

            let resolution = options
                .conflict_predicate
                .as_ref()
                .map_or(ConflictResolution::UseDefault, |predicate| {
                    predicate.resolve(&candidates, &new_compilation)
                });
            let conflict = match resolution {
                ConflictResolution::NoConflict => false,
                ConflictResolution::Conflict => true,
                ConflictResolution::UseDefault => {
                    !(candidates.len() == 1 && Some(&candidates[0]) == expected.as_ref())
                }
            };
            trace!(
                document = %location.document,
                span = %location.span,
                candidates = candidates.len(),
                ?resolution,
                conflict,
                "checked renamed reference"
            );
            if conflict {
                conflicts.push(RenameConflict {
                    kind: ConflictKind::Reference,
                    document: location.document,
                    span: location.span,
                    candidates: candidates.iter().map(|s| s.key().clone()).collect(),
                });
            }
        }

        if !conflicts.is_empty() {
            for conflict in &conflicts {
                warn!(%conflict, "rename conflict");
            }
            return Err(RenameError::Conflicts(conflicts));
        }

        debug!(
            key = %symbol.key(),
            new_name,
            locations = renamed.len(),
            documents = by_document.len(),
            version = %next.version(),
            "renamed symbol"
        );
        Ok(next)
    }
}

fn check_cancelled(cancel: &CancellationToken) -> Result<(), RenameError> {
    if cancel.is_cancelled() {
        Err(RenameError::Cancelled)
    } else {
        Ok(())
    }
}

/// Members of the containing type that already carry `new_name`.
fn declaration_conflicts(
    compilation: &Compilation,
    symbol: &Symbol,
    new_name: &str,
    renamed: &[Renamed],
) -> Vec<RenameConflict> {
    if !symbol.kind().is_member() {
        return Vec::new();
    }
    let Some(ty) = compilation.containing_type(symbol) else {
        return Vec::new();
    };
    let clashing: Vec<SymbolKey> = compilation
        .members_named(&ty, new_name)
        .iter()
        .filter(|member| *member != symbol)
        .map(|member| member.key().clone())
        .collect();
    if clashing.is_empty() {
        return Vec::new();
    }
    renamed
        .iter()
        .filter(|r| r.is_declaration)
        .map(|r| RenameConflict {
            kind: ConflictKind::Declaration,
            document: r.document,
            span: r.span,
            candidates: clashing.clone(),
        })
        .collect()
}

/// Replace each span of `text` with `new_name`. Returns the new text and
/// where each span landed in it; a span that is out of bounds or overlaps
/// its predecessor is left alone and maps to `None`.
fn rewrite(text: &str, spans: &[TextSpan], new_name: &str) -> (String, Vec<Option<TextSpan>>) {
    let mut out = String::with_capacity(text.len());
    let mut moved = Vec::with_capacity(spans.len());
    let mut cursor = 0usize;
    for span in spans {
        let (start, end) = (span.start as usize, span.end as usize);
        if start < cursor || text.get(start..end).is_none() {
            moved.push(None);
            continue;
        }
        out.push_str(&text[cursor..start]);
        moved.push(Some(TextSpan::at(out.len() as u32, new_name.len() as u32)));
        out.push_str(new_name);
        cursor = end;
    }
    out.push_str(&text[cursor..]);
    (out, moved)
}

#[cfg(test)]
#[path = "../tests/rewrite_tests.rs"]
mod rewrite_tests;
