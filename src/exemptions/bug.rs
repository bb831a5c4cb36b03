use glob::Pattern;
use serde::Serialize;
use tracing::debug;

use super::ExemptionKind;
use crate::config::source::{get_list, get_text, indices, ConfigSource};
use crate::errors::ExemptorError;
use crate::models::VulnerableDependency;

/// Exempts one bug identifier, optionally only for some libraries.
#[derive(Debug, Clone, Serialize)]
pub struct ExemptionBug {
    bug_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    /// Library patterns; empty means every library.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    libraries: Vec<String>,
    #[serde(skip)]
    compiled: Vec<Pattern>,
}

impl PartialEq for ExemptionBug {
    fn eq(&self, other: &Self) -> bool {
        self.bug_id == other.bug_id
            && self.reason == other.reason
            && self.libraries == other.libraries
    }
}

impl Eq for ExemptionBug {}

impl ExemptionBug {
    pub fn new(bug_id: impl Into<String>) -> Result<Self, ExemptorError> {
        Self::build(None, bug_id.into(), None, Vec::new())
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Restrict the rule to libraries matching any of `patterns`. A `*`
    /// pattern lifts the restriction.
    pub fn with_libraries<I, P>(self, patterns: I) -> Result<Self, ExemptorError>
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let libraries = patterns.into_iter().map(Into::into).collect();
        Self::build(None, self.bug_id, self.reason, libraries)
    }

    fn build(
        index: Option<usize>,
        bug_id: String,
        reason: Option<String>,
        libraries: Vec<String>,
    ) -> Result<Self, ExemptorError> {
        let bug_id = bug_id.trim().to_string();
        if bug_id.is_empty() {
            return Err(ExemptorError::invalid(
                ExemptionKind::Bug,
                index,
                "missing or empty bug identifier",
            ));
        }

        let libraries: Vec<String> = if libraries.iter().any(|l| l.trim() == "*") {
            Vec::new()
        } else {
            libraries.into_iter().map(|l| l.trim().to_string()).filter(|l| !l.is_empty()).collect()
        };

        let compiled = libraries
            .iter()
            .map(|l| {
                Pattern::new(l).map_err(|e| {
                    ExemptorError::invalid(
                        ExemptionKind::Bug,
                        index,
                        format!("invalid library pattern '{}': {}", l, e),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { bug_id, reason, libraries, compiled })
    }

    pub fn bug_id(&self) -> &str {
        &self.bug_id
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn libraries(&self) -> &[String] {
        &self.libraries
    }

    pub fn is_exempted(&self, dep: &VulnerableDependency) -> bool {
        if dep.bug_id != self.bug_id {
            return false;
        }
        if self.compiled.is_empty() {
            return true;
        }
        match dep.library.as_deref() {
            Some(library) => self.compiled.iter().any(|p| p.matches(library)),
            None => false,
        }
    }

    pub fn justification(&self) -> String {
        if let Some(reason) = &self.reason {
            return reason.clone();
        }
        if self.libraries.is_empty() {
            format!("Bug {} is exempted", self.bug_id)
        } else {
            format!("Bug {} is exempted for libraries {}", self.bug_id, self.libraries.join(", "))
        }
    }

    /// Read every `exemption.bug.<n>` entry from `source`, in index order.
    ///
    /// The identifier is taken from `exemption.bug.<n>.id`, or from
    /// `exemption.bug.<n>` itself when given as a plain value.
    pub fn read_from_configuration<S: ConfigSource + ?Sized>(
        source: &S,
    ) -> Result<Vec<Self>, ExemptorError> {
        let prefix = ExemptionKind::Bug.key_prefix();
        let indices = indices(source, &prefix)
            .map_err(|reason| ExemptorError::invalid(ExemptionKind::Bug, None, reason))?;

        let mut rules = Vec::with_capacity(indices.len());
        for index in indices {
            let base = format!("{}.{}", prefix, index);
            let bug_id = get_text(source, &format!("{}.id", base))
                .or_else(|| get_text(source, &base))
                .unwrap_or_default();
            let reason = get_text(source, &format!("{}.reason", base));
            let libraries = get_list(source, &format!("{}.libraries", base))
                .map_err(|reason| ExemptorError::invalid(ExemptionKind::Bug, Some(index), reason))?;

            let rule = Self::build(Some(index), bug_id, reason, libraries)?;
            debug!(index, bug_id = %rule.bug_id, "Read bug exemption");
            rules.push(rule);
        }
        Ok(rules)
    }
}
