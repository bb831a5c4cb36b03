use glob::{MatchOptions, Pattern};
use serde::Serialize;
use tracing::debug;

use super::ExemptionKind;
use crate::config::source::{get_text, indices, ConfigSource};
use crate::errors::ExemptorError;
use crate::models::VulnerableDependency;

/// `?` and `*` never cross a `/`; `**` as a whole segment spans segments.
const SCOPE_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Exempts findings whose scope path matches a glob pattern.
#[derive(Debug, Clone, Serialize)]
pub struct ExemptionScope {
    pattern: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip)]
    compiled: Pattern,
}

impl PartialEq for ExemptionScope {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.reason == other.reason
    }
}

impl Eq for ExemptionScope {}

impl ExemptionScope {
    pub fn new(pattern: impl Into<String>) -> Result<Self, ExemptorError> {
        Self::build(None, pattern.into(), None)
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    fn build(
        index: Option<usize>,
        pattern: String,
        reason: Option<String>,
    ) -> Result<Self, ExemptorError> {
        let pattern = pattern.trim().to_string();
        if pattern.is_empty() {
            return Err(ExemptorError::invalid(
                ExemptionKind::Scope,
                index,
                "missing or empty scope pattern",
            ));
        }
        let compiled = Pattern::new(&pattern).map_err(|e| {
            ExemptorError::invalid(
                ExemptionKind::Scope,
                index,
                format!("invalid scope pattern '{}': {}", pattern, e),
            )
        })?;
        Ok(Self { pattern, reason, compiled })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn is_exempted(&self, dep: &VulnerableDependency) -> bool {
        dep.scope
            .as_deref()
            .map_or(false, |scope| self.compiled.matches_with(scope, SCOPE_MATCH))
    }

    pub fn justification(&self) -> String {
        self.reason
            .clone()
            .unwrap_or_else(|| format!("Findings in scope '{}' are exempted", self.pattern))
    }

    /// Read every `exemption.scope.<n>` entry from `source`, in index order.
    ///
    /// The pattern is taken from `exemption.scope.<n>.pattern`, or from
    /// `exemption.scope.<n>` itself when given as a plain value.
    pub fn read_from_configuration<S: ConfigSource + ?Sized>(
        source: &S,
    ) -> Result<Vec<Self>, ExemptorError> {
        let prefix = ExemptionKind::Scope.key_prefix();
        let indices = indices(source, &prefix)
            .map_err(|reason| ExemptorError::invalid(ExemptionKind::Scope, None, reason))?;

        let mut rules = Vec::with_capacity(indices.len());
        for index in indices {
            let base = format!("{}.{}", prefix, index);
            let pattern = get_text(source, &format!("{}.pattern", base))
                .or_else(|| get_text(source, &base))
                .unwrap_or_default();
            let reason = get_text(source, &format!("{}.reason", base));

            let rule = Self::build(Some(index), pattern, reason)?;
            debug!(index, pattern = %rule.pattern, "Read scope exemption");
            rules.push(rule);
        }
        Ok(rules)
    }
}
