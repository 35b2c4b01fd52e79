//! The diagnostic this fix consumes and the action it offers.

use propfix_common::{DocumentId, TextSpan};
use serde::{Deserialize, Serialize};

/// Analyzer id of "use auto property".
pub const USE_AUTO_PROPERTY_ID: &str = "PF0032";

/// Equivalence key the analyzer uses when field and property are compared
/// by symbol key.
pub const DEFAULT_EQUIVALENCE_KEY: &str = "UseAutoProperty";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub document: DocumentId,
    pub span: TextSpan,
}

impl Location {
    pub fn new(document: DocumentId, span: TextSpan) -> Self {
        Location { document, span }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub id: String,
    /// Anywhere inside the property declaration; usually its name.
    pub property_location: Location,
    /// Anywhere inside the field's declarator; usually its name.
    pub field_location: Location,
    pub equivalence_key: String,
}

impl Diagnostic {
    pub fn use_auto_property(property_location: Location, field_location: Location) -> Self {
        Diagnostic {
            id: USE_AUTO_PROPERTY_ID.to_string(),
            property_location,
            field_location,
            equivalence_key: DEFAULT_EQUIVALENCE_KEY.to_string(),
        }
    }
}

/// An offered fix, before it is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeAction {
    pub title: String,
    pub equivalence_key: String,
}
