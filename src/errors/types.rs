use thiserror::Error;

use crate::exemptions::ExemptionKind;

#[derive(Debug, Error)]
pub enum ExemptorError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// A single exemption rule could not be built from its settings.
    /// `index` is `None` for rules that are not indexed (e.g. `exemption.unassessed`).
    #[error("Invalid {kind} exemption{}: {reason}", .index.map(|i| format!(" #{}", i)).unwrap_or_default())]
    InvalidExemption {
        kind: ExemptionKind,
        index: Option<usize>,
        reason: String,
    },

    #[error("{0} finding(s) are not covered by any exemption")]
    ActiveFindings(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExemptorError {
    pub fn invalid(kind: ExemptionKind, index: Option<usize>, reason: impl Into<String>) -> Self {
        ExemptorError::InvalidExemption { kind, index, reason: reason.into() }
    }

    /// True for every error that stems from bad configuration content, as
    /// opposed to I/O or storage failures.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ExemptorError::Config(_)
                | ExemptorError::InvalidExemption { .. }
                | ExemptorError::Yaml(_)
        )
    }
}
