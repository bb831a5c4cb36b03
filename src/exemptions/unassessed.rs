use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::ExemptionKind;
use crate::config::source::{get_text, has_entry, ConfigSource};
use crate::errors::ExemptorError;
use crate::models::VulnerableDependency;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnassessedMode {
    /// Every unassessed finding.
    All,
    /// Unassessed findings on libraries flagged as known.
    Known,
}

impl UnassessedMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Known => "known",
        }
    }

    /// Parse a configured mode. `Ok(None)` means the rule is switched off.
    pub fn parse(value: &str) -> Result<Option<Self>, String> {
        match value.trim().to_lowercase().as_str() {
            "all" | "true" => Ok(Some(Self::All)),
            "known" => Ok(Some(Self::Known)),
            "off" | "false" | "none" | "" => Ok(None),
            other => Err(format!("unknown mode '{}', expected all, known or off", other)),
        }
    }
}

impl std::fmt::Display for UnassessedMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exempts findings that no reviewer has assessed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExemptionUnassessed {
    mode: UnassessedMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl ExemptionUnassessed {
    pub fn new(mode: UnassessedMode) -> Self {
        Self { mode, reason: None }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn mode(&self) -> UnassessedMode {
        self.mode
    }

    pub fn is_exempted(&self, dep: &VulnerableDependency) -> bool {
        if !dep.is_unassessed() {
            return false;
        }
        match self.mode {
            UnassessedMode::All => true,
            UnassessedMode::Known => dep.library_known == Some(true),
        }
    }

    pub fn justification(&self) -> String {
        if let Some(reason) = &self.reason {
            return reason.clone();
        }
        match self.mode {
            UnassessedMode::All => "Unassessed findings are exempted".to_string(),
            UnassessedMode::Known => {
                "Unassessed findings on known libraries are exempted".to_string()
            }
        }
    }

    /// Read the rule from `exemption.unassessed` (or `exemption.unassessed.mode`).
    /// Yields at most one rule; none when the key is absent or `off`.
    pub fn read_from_configuration<S: ConfigSource + ?Sized>(
        source: &S,
    ) -> Result<Vec<Self>, ExemptorError> {
        let prefix = ExemptionKind::Unassessed.key_prefix();
        let value = source
            .get(&prefix)
            .or_else(|| source.get(&format!("{}.mode", prefix)));

        let Some(value) = value else {
            if has_entry(source, &prefix) {
                warn!(
                    key = %prefix,
                    "Unassessed exemption settings present without a mode, rule is off"
                );
            }
            return Ok(Vec::new());
        };

        let mode = UnassessedMode::parse(value)
            .map_err(|reason| ExemptorError::invalid(ExemptionKind::Unassessed, None, reason))?;

        let Some(mode) = mode else {
            debug!("Unassessed exemption is off");
            return Ok(Vec::new());
        };

        let mut rule = Self::new(mode);
        rule.reason = get_text(source, &format!("{}.reason", prefix));
        debug!(mode = %mode, "Read unassessed exemption");
        Ok(vec![rule])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn map(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_unassessed_matches_only_explicit_false() {
        let rule = ExemptionUnassessed::new(UnassessedMode::All);
        assert!(rule.is_exempted(&VulnerableDependency::new("CVE-1").with_assessed(false)));
        assert!(!rule.is_exempted(&VulnerableDependency::new("CVE-1").with_assessed(true)));
        assert!(!rule.is_exempted(&VulnerableDependency::new("CVE-1")));
    }

    #[test]
    fn test_known_mode_requires_known_library() {
        let rule = ExemptionUnassessed::new(UnassessedMode::Known);
        let base = VulnerableDependency::new("CVE-1").with_assessed(false);
        assert!(rule.is_exempted(&base.clone().with_library_known(true)));
        assert!(!rule.is_exempted(&base.clone().with_library_known(false)));
        assert!(!rule.is_exempted(&base));
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(UnassessedMode::parse("ALL").unwrap(), Some(UnassessedMode::All));
        assert_eq!(UnassessedMode::parse("true").unwrap(), Some(UnassessedMode::All));
        assert_eq!(UnassessedMode::parse(" known ").unwrap(), Some(UnassessedMode::Known));
        assert_eq!(UnassessedMode::parse("off").unwrap(), None);
        assert_eq!(UnassessedMode::parse("false").unwrap(), None);
        assert!(UnassessedMode::parse("sometimes").is_err());
    }

    #[test]
    fn test_read_absent_key_yields_no_rule() {
        assert!(ExemptionUnassessed::read_from_configuration(&HashMap::new()).unwrap().is_empty());
    }

    #[test]
    fn test_read_mode_and_reason() {
        let source = map(&[
            ("exemption.unassessed", "known"),
            ("exemption.unassessed.reason", "triage backlog"),
        ]);
        let rules = ExemptionUnassessed::read_from_configuration(&source).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].mode(), UnassessedMode::Known);
        assert_eq!(rules[0].justification(), "triage backlog");
    }

    #[test]
    fn test_read_nested_mode_key() {
        let source = map(&[("exemption.unassessed.mode", "all")]);
        let rules = ExemptionUnassessed::read_from_configuration(&source).unwrap();
        assert_eq!(rules[0].mode(), UnassessedMode::All);
    }

    #[test]
    fn test_read_off_yields_no_rule() {
        let source = map(&[("exemption.unassessed", "off")]);
        assert!(ExemptionUnassessed::read_from_configuration(&source).unwrap().is_empty());
    }

    #[test]
    fn test_read_unknown_mode_fails() {
        let source = map(&[("exemption.unassessed", "sometimes")]);
        let err = ExemptionUnassessed::read_from_configuration(&source).unwrap_err();
        assert!(matches!(
            err,
            ExemptorError::InvalidExemption { kind: ExemptionKind::Unassessed, index: None, .. }
        ));
    }
}
