use serde::{Deserialize, Serialize};

/// Knobs for the splice step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FixOptions {
    /// Move the field's initializer onto the property (`{ get; set; } = 5;`).
    pub move_initializer: bool,
    /// Collapse the blank lines left where the field was.
    pub format: bool,
}

impl Default for FixOptions {
    fn default() -> Self {
        FixOptions {
            move_initializer: true,
            format: true,
        }
    }
}
