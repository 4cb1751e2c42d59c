use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::status::ValidationStatus;

/// Final outcome for one document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Claimed identity is supported by the document.
    Valid,
    /// The search exhausted every orientation without reaching validity.
    Invalid,
    /// Bad input (missing files, unusable claim, undecodable image); the
    /// document never entered the search.
    ConfigError,
    /// A collaborator fault interrupted the search; see `reason`.
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Outcome::Valid => "VALID",
            Outcome::Invalid => "INVALID",
            Outcome::ConfigError => "CONFIG_ERROR",
            Outcome::Failed => "FAILED",
        };
        write!(f, "{name}")
    }
}

/// The three per-field statuses a validator tracks.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldStatuses {
    pub headshot: ValidationStatus,
    pub dob: ValidationStatus,
    pub name: ValidationStatus,
}

impl fmt::Display for FieldStatuses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HEADSHOT: {} | DOB: {} | NAME: {}",
            self.headshot, self.dob, self.name
        )
    }
}

/// What the batch layer reports for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    pub outcome: Outcome,
    pub statuses: FieldStatuses,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DocumentReport {
    pub fn rejected(outcome: Outcome, reason: String) -> Self {
        Self {
            outcome,
            statuses: FieldStatuses::default(),
            reason: Some(reason),
        }
    }
}
