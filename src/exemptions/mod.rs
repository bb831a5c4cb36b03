//! Exemption rules decide whether a vulnerable dependency is left out of
//! reporting, and say why.

pub mod bug;
pub mod scope;
pub mod set;
pub mod unassessed;

use serde::{Deserialize, Serialize};

use crate::models::VulnerableDependency;

pub use bug::ExemptionBug;
pub use scope::ExemptionScope;
pub use set::ExemptionSet;
pub use unassessed::{ExemptionUnassessed, UnassessedMode};

/// Root key under which all exemption settings live.
pub const KEY_ROOT: &str = "exemption";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExemptionKind {
    Bug,
    Scope,
    Unassessed,
}

impl ExemptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::Scope => "scope",
            Self::Unassessed => "unassessed",
        }
    }

    /// Settings key prefix for this kind, e.g. `exemption.bug`.
    pub fn key_prefix(&self) -> String {
        format!("{}.{}", KEY_ROOT, self.as_str())
    }
}

impl std::fmt::Display for ExemptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single exemption rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Exemption {
    Bug(ExemptionBug),
    Scope(ExemptionScope),
    Unassessed(ExemptionUnassessed),
}

impl Exemption {
    pub fn kind(&self) -> ExemptionKind {
        match self {
            Exemption::Bug(_) => ExemptionKind::Bug,
            Exemption::Scope(_) => ExemptionKind::Scope,
            Exemption::Unassessed(_) => ExemptionKind::Unassessed,
        }
    }

    /// Whether this rule suppresses `dep`. Never fails; absent input fields
    /// count as "no match".
    pub fn is_exempted(&self, dep: &VulnerableDependency) -> bool {
        match self {
            Exemption::Bug(e) => e.is_exempted(dep),
            Exemption::Scope(e) => e.is_exempted(dep),
            Exemption::Unassessed(e) => e.is_exempted(dep),
        }
    }

    /// Human-readable reason recorded next to a suppressed finding.
    pub fn justification(&self) -> String {
        match self {
            Exemption::Bug(e) => e.justification(),
            Exemption::Scope(e) => e.justification(),
            Exemption::Unassessed(e) => e.justification(),
        }
    }
}

impl std::fmt::Display for Exemption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind(), self.justification())
    }
}

impl From<ExemptionBug> for Exemption {
    fn from(e: ExemptionBug) -> Self {
        Exemption::Bug(e)
    }
}

impl From<ExemptionScope> for Exemption {
    fn from(e: ExemptionScope) -> Self {
        Exemption::Scope(e)
    }
}

impl From<ExemptionUnassessed> for Exemption {
    fn from(e: ExemptionUnassessed) -> Self {
        Exemption::Unassessed(e)
    }
}
