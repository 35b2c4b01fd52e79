use crate::diagnostic::{CodeAction, Diagnostic, USE_AUTO_PROPERTY_ID};
use crate::error::FixError;
use crate::options::FixOptions;
use crate::services::{SymbolRenamer, SymbolResolver, WorkspaceServices};
use crate::splice::SplicePath;
use crate::transaction::Located;
use propfix_common::DocumentId;
use propfix_workspace::Solution;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info_span, warn};

pub const USE_AUTO_PROPERTY_TITLE: &str = "Use auto property";

/// Result of a successful fix.
#[derive(Debug)]
pub struct FixOutcome {
    pub solution: Solution,
    pub path: SplicePath,
    /// Documents whose text differs from the input solution.
    pub changed_documents: Vec<DocumentId>,
}

/// Converts a field-backed property into an auto-property.
pub struct UseAutoPropertyCodeFix {
    resolver: Arc<dyn SymbolResolver>,
    renamer: Arc<dyn SymbolRenamer>,
    options: FixOptions,
}

impl Default for UseAutoPropertyCodeFix {
    fn default() -> Self {
        let services = Arc::new(WorkspaceServices::new());
        UseAutoPropertyCodeFix::with_services(services.clone(), services)
    }
}

impl UseAutoPropertyCodeFix {
    pub fn new() -> Self {
        UseAutoPropertyCodeFix::default()
    }

    pub fn with_services(
        resolver: Arc<dyn SymbolResolver>,
        renamer: Arc<dyn SymbolRenamer>,
    ) -> Self {
        UseAutoPropertyCodeFix {
            resolver,
            renamer,
            options: FixOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FixOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &FixOptions {
        &self.options
    }

    pub fn fixable_diagnostic_ids(&self) -> &'static [&'static str] {
        &[USE_AUTO_PROPERTY_ID]
    }

    /// The action offered for `diagnostic`, if this fix handles it.
    pub fn register(&self, diagnostic: &Diagnostic) -> Option<CodeAction> {
        self.handles(diagnostic).then(|| CodeAction {
            title: USE_AUTO_PROPERTY_TITLE.to_string(),
            equivalence_key: diagnostic.equivalence_key.clone(),
        })
    }

    fn handles(&self, diagnostic: &Diagnostic) -> bool {
        self.fixable_diagnostic_ids()
            .contains(&diagnostic.id.as_str())
    }

    /// Run the whole transaction against `solution`.
    ///
    /// `solution` is never modified. On error nothing has been committed and
    /// the caller's snapshot is still current.
    pub async fn apply_fix(
        &self,
        solution: &Solution,
        diagnostic: &Diagnostic,
        cancel: &CancellationToken,
    ) -> Result<FixOutcome, FixError> {
        if !self.handles(diagnostic) {
            return Err(FixError::UnsupportedDiagnostic(diagnostic.id.clone()));
        }
        let span = info_span!(
            "use_auto_property",
            field = %diagnostic.field_location.document,
            property = %diagnostic.property_location.document,
        );
        let result = async {
            let spliced = Located::locate(self.resolver.as_ref(), solution, diagnostic, cancel)
                .await?
                .rename(self.renamer.as_ref(), cancel)
                .await?
                .reresolve(self.resolver.as_ref(), cancel)
                .await?
                .splice(&self.options)?;
            let changed_documents = spliced.solution.changed_documents(solution);
            debug!(path = ?spliced.path, changed = changed_documents.len(), "fix applied");
            Ok::<_, FixError>(FixOutcome {
                solution: spliced.solution,
                path: spliced.path,
                changed_documents,
            })
        }
        .instrument(span)
        .await;

        if let Err(err) = &result {
            if err.is_contract_violation() {
                warn!(error = %err, "use auto property aborted on inconsistent input");
            } else {
                debug!(error = %err, "use auto property not applied");
            }
        }
        result
    }
}
