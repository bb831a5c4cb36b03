use serde::{Deserialize, Serialize};

/// A detected use of a known vulnerability in a consumed dependency.
///
/// Optional fields describe facts the detecting side may not know. Rules treat
/// an absent field as "does not match", so missing data never suppresses a
/// finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnerableDependency {
    /// Vulnerability identifier, e.g. `CVE-2014-0050`.
    pub bug_id: String,
    /// Code location where the vulnerable construct is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Coordinate of the affected library (e.g. `group:artifact:version`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,
    /// Whether a human reviewer has triaged this finding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessed: Option<bool>,
    /// Whether the library is a well-known published artifact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_known: Option<bool>,
}

impl VulnerableDependency {
    pub fn new(bug_id: impl Into<String>) -> Self {
        Self {
            bug_id: bug_id.into(),
            scope: None,
            library: None,
            assessed: None,
            library_known: None,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_library(mut self, library: impl Into<String>) -> Self {
        self.library = Some(library.into());
        self
    }

    pub fn with_assessed(mut self, assessed: bool) -> Self {
        self.assessed = Some(assessed);
        self
    }

    pub fn with_library_known(mut self, known: bool) -> Self {
        self.library_known = Some(known);
        self
    }

    /// Only an explicit `assessed: false` counts as unassessed.
    pub fn is_unassessed(&self) -> bool {
        self.assessed == Some(false)
    }
}
