use crate::errors::ExemptorError;

/// Rejected anywhere inside a string value.
const DANGEROUS_FRAGMENTS: &[&str] = &[
    "../",
    "..\\",
    "<script",
];

/// Rejected at the start of a string value. Reasons are free text, so these
/// are not matched mid-sentence.
const DANGEROUS_SCHEMES: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
];

pub fn validate_security_patterns(value: &serde_yaml::Value) -> Result<(), ExemptorError> {
    check_value(value, &[])?;
    Ok(())
}

fn check_value(value: &serde_yaml::Value, path: &[String]) -> Result<(), ExemptorError> {
    match value {
        serde_yaml::Value::String(s) => {
            let lower = s.trim().to_lowercase();
            let hit = DANGEROUS_FRAGMENTS
                .iter()
                .find(|p| lower.contains(*p))
                .or_else(|| DANGEROUS_SCHEMES.iter().find(|p| lower.starts_with(*p)));
            if let Some(pattern) = hit {
                let path_str = if path.is_empty() { "root".to_string() } else { path.join(".") };
                return Err(ExemptorError::Config(
                    format!("Dangerous pattern '{}' found at config path: {}", pattern, path_str)
                ));
            }
            Ok(())
        }
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                let key = k.as_str().unwrap_or("unknown").to_string();
                let mut new_path = path.to_vec();
                new_path.push(key);
                check_value(v, &new_path)?;
            }
            Ok(())
        }
        serde_yaml::Value::Sequence(seq) => {
            for (i, v) in seq.iter().enumerate() {
                let mut new_path = path.to_vec();
                new_path.push(format!("[{}]", i));
                check_value(v, &new_path)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> serde_yaml::Value {
        serde_yaml::from_str::<serde_yaml::Value>(s).unwrap()
    }

    #[test]
    fn test_safe_config_passes() {
        let value =
            yaml("exemption:\n  bug:\n    - CVE-2014-0050\n  scope:\n    - /trunk/src/test/**\n");
        assert!(validate_security_patterns(&value).is_ok());
    }

    #[test]
    fn test_scheme_inside_reason_passes() {
        let value =
            yaml("exemption:\n  bug:\n    - id: CVE-1\n      reason: 'affects profile: none'\n");
        assert!(validate_security_patterns(&value).is_ok());
    }

    #[test]
    fn test_directory_traversal_blocked() {
        let value = yaml("exemption:\n  scope:\n    - /trunk/../../etc/*\n");
        let err = validate_security_patterns(&value).unwrap_err();
        assert!(err.to_string().contains("exemption.scope.[0]"));
    }

    #[test]
    fn test_script_injection_blocked() {
        let value = yaml(
            "exemption:\n  bug:\n    - id: CVE-1\n      reason: '<script>alert(1)</script>'\n",
        );
        assert!(validate_security_patterns(&value).is_err());
    }

    #[test]
    fn test_javascript_uri_blocked() {
        assert!(validate_security_patterns(&yaml("url: 'javascript:void(0)'")).is_err());
    }

    #[test]
    fn test_file_uri_blocked() {
        assert!(validate_security_patterns(&yaml("path: 'file:///etc/passwd'")).is_err());
    }

    #[test]
    fn test_numeric_values_pass() {
        assert!(validate_security_patterns(&yaml("limit: 8080\nenabled: true")).is_ok());
    }
}
