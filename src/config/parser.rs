use std::collections::HashSet;
use std::path::Path;
use crate::errors::ExemptorError;
use crate::exemptions::{Exemption, ExemptionSet};
use super::types::ExemptorConfig;
use super::security::validate_security_patterns;
use super::schema::CONFIG_SCHEMA;
use tracing::{info, warn};

pub async fn parse_config(path: &Path) -> Result<ExemptorConfig, ExemptorError> {
    if !path.exists() {
        return Err(ExemptorError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(ExemptorError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config = parse_config_str(&content)?;
    info!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

/// Parse and validate configuration text. Exemption rules are built once here
/// so a bad rule fails at load time rather than at first use.
pub fn parse_config_str(content: &str) -> Result<ExemptorConfig, ExemptorError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;

    validate_security_patterns(&yaml)?;

    validate_schema(&yaml)?;

    let config: ExemptorConfig = serde_yaml::from_value(yaml)?;

    let set = ExemptionSet::from_configuration(&config.settings())?;
    validate_conflicts(&set);

    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), ExemptorError> {
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| ExemptorError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| ExemptorError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        // Advisory only: rule construction is the authoritative check.
        for e in errors {
            warn!(validation_error = %e, path = %e.instance_path, "Config schema warning");
        }
    }

    Ok(())
}

/// Warn about rules that are distinct but overlap in a way that is usually a
/// copy/paste mistake.
fn validate_conflicts(set: &ExemptionSet) {
    let mut bug_ids = HashSet::new();
    let mut patterns = HashSet::new();
    for exemption in set {
        match exemption {
            Exemption::Bug(bug) => {
                if !bug_ids.insert(bug.bug_id()) {
                    warn!(bug_id = %bug.bug_id(), "Bug is exempted by more than one rule");
                }
            }
            Exemption::Scope(scope) => {
                if !patterns.insert(scope.pattern()) {
                    warn!(pattern = %scope.pattern(), "Scope pattern is listed more than once");
                }
            }
            Exemption::Unassessed(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exemptions::ExemptionKind;
    use std::io::Write;

    #[test]
    fn test_parse_valid_config() {
        let config = parse_config_str(
            "exemption:\n  bug:\n    - id: CVE-2014-0050\n      reason: capped upload size\n  scope:\n    - /trunk/src/test/*\n  unassessed: known\ndatabase:\n  path: ./data/exemptor.db\n"
        ).unwrap();
        assert_eq!(config.database_path(), Some("./data/exemptor.db"));
        let set = ExemptionSet::from_configuration(&config.settings()).unwrap();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_parse_empty_exemption_section() {
        let config = parse_config_str("output:\n  format: json\n").unwrap();
        assert!(config.settings().is_empty());
    }

    #[test]
    fn test_parse_rejects_empty_bug_id() {
        let err = parse_config_str("exemption:\n  bug:\n    - id: ''\n").unwrap_err();
        assert!(matches!(
            err,
            ExemptorError::InvalidExemption { kind: ExemptionKind::Bug, index: Some(0), .. }
        ));
    }

    #[test]
    fn test_parse_rejects_bad_scope_pattern() {
        let err = parse_config_str("exemption:\n  scope:\n    - '/src/[abc'\n").unwrap_err();
        assert!(matches!(err, ExemptorError::InvalidExemption { kind: ExemptionKind::Scope, .. }));
    }

    #[test]
    fn test_parse_rejects_dangerous_value() {
        let err = parse_config_str("exemption:\n  scope:\n    - '../../etc/*'\n").unwrap_err();
        assert!(matches!(err, ExemptorError::Config(_)));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        assert!(matches!(parse_config_str("exemption: [unclosed"), Err(ExemptorError::Yaml(_))));
    }

    #[tokio::test]
    async fn test_parse_config_missing_file() {
        let err = parse_config(Path::new("/nonexistent/exemptor.yaml")).await.unwrap_err();
        assert!(matches!(err, ExemptorError::Config(_)));
    }

    #[tokio::test]
    async fn test_parse_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "exemption:\n  bug:\n    - CVE-2014-0050").unwrap();
        let config = parse_config(file.path()).await.unwrap();
        assert_eq!(ExemptionSet::from_configuration(&config.settings()).unwrap().len(), 1);
    }
}
