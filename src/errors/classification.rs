use super::types::ExemptorError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub exit_code: i32,
}

impl ExemptorError {
    /// Classify this error to determine its type and the process exit code.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            ExemptorError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                exit_code: 2,
            },
            ExemptorError::InvalidExemption { .. } => ErrorClassification {
                error_type: "ConfigurationError",
                exit_code: 2,
            },
            ExemptorError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                exit_code: 2,
            },
            ExemptorError::Database(_) => ErrorClassification {
                error_type: "DatabaseError",
                exit_code: 3,
            },
            ExemptorError::ActiveFindings(_) => ErrorClassification {
                error_type: "ActiveFindings",
                exit_code: 4,
            },
            ExemptorError::Io(_) => ErrorClassification {
                error_type: "IoError",
                exit_code: 1,
            },
            ExemptorError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                exit_code: 1,
            },
            ExemptorError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                exit_code: 1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exemptions::ExemptionKind;

    #[test]
    fn test_config_error_exit_code() {
        let err = ExemptorError::Config("invalid config".into());
        let class = err.classify();
        assert_eq!(class.exit_code, 2);
        assert_eq!(class.error_type, "ConfigError");
    }

    #[test]
    fn test_invalid_exemption_is_configuration_error() {
        let err = ExemptorError::invalid(ExemptionKind::Bug, Some(0), "empty");
        let class = err.classify();
        assert_eq!(class.error_type, "ConfigurationError");
        assert_eq!(class.exit_code, 2);
    }

    #[test]
    fn test_database_exit_code() {
        assert_eq!(ExemptorError::Database("locked".into()).classify().exit_code, 3);
    }

    #[test]
    fn test_active_findings_exit_code() {
        assert_eq!(ExemptorError::ActiveFindings(1).classify().exit_code, 4);
    }

    #[test]
    fn test_internal_exit_code() {
        assert_eq!(ExemptorError::Internal("boom".into()).classify().exit_code, 1);
    }
}
