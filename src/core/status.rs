use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-field validation status. The variants form a total order
/// (`Failed < Partial < Complete`) and a field only ever moves up it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Failed,
    Partial,
    Complete,
}

impl ValidationStatus {
    pub fn is_complete(&self) -> bool {
        *self == ValidationStatus::Complete
    }

    pub fn is_partial(&self) -> bool {
        *self == ValidationStatus::Partial
    }

    pub fn is_failed(&self) -> bool {
        *self == ValidationStatus::Failed
    }

    /// Monotonic merge: the status keeps whichever of the two values is
    /// further along, so observations can never downgrade a field.
    pub fn advance(&mut self, observed: ValidationStatus) {
        *self = (*self).max(observed);
    }
}

impl Default for ValidationStatus {
    fn default() -> Self {
        ValidationStatus::Failed
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationStatus::Failed => "FAILED",
            ValidationStatus::Partial => "PARTIAL",
            ValidationStatus::Complete => "COMPLETE",
        };
        write!(f, "{name}")
    }
}
