use exemptor::cli::check::{read_findings, run_check};
use exemptor::config::{parse_config, OutputFormat};
use exemptor::db::Database;
use exemptor::exemptions::{ExemptionKind, ExemptionSet};
use exemptor::models::VulnerableDependency;
use exemptor::ExemptorError;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CONFIG: &str = "\
exemption:
  bug:
    - id: CVE-2014-0050
      reason: upload size is capped by the proxy
      libraries:
        - 'commons-fileupload:commons-fileupload:*'
  scope:
    - /trunk/src/test/**
    - pattern: /trunk/src/main/java/com/acme/*
      reason: acme module is not deployed
  unassessed: known
output:
  format: markdown
";

fn make_test_findings() -> Vec<VulnerableDependency> {
    vec![
        VulnerableDependency::new("CVE-2014-0050")
            .with_library("commons-fileupload:commons-fileupload:1.3")
            .with_scope("/trunk/src/main/java/com/other/Upload.java")
            .with_assessed(true),
        VulnerableDependency::new("CVE-2014-0050")
            .with_library("org.apache.tomcat:tomcat-coyote:7.0.50")
            .with_scope("/trunk/src/main/java/com/other/Upload.java")
            .with_assessed(true),
        VulnerableDependency::new("CVE-2016-3092")
            .with_scope("/trunk/src/main/java/com/acme/Foo.java"),
        VulnerableDependency::new("CVE-2016-3092")
            .with_scope("/branch/1.x/src/main/java/com/acme/Foo.java")
            .with_assessed(false)
            .with_library_known(true),
        VulnerableDependency::new("CVE-2016-3092")
            .with_scope("/branch/1.x/src/main/java/com/acme/Foo.java")
            .with_assessed(false),
    ]
}

fn create_fixture(dir: &TempDir) -> (PathBuf, PathBuf) {
    let config_path = dir.path().join("exemptor.yaml");
    fs::write(&config_path, CONFIG).unwrap();

    let findings_path = dir.path().join("findings.json");
    let json = serde_json::to_string_pretty(&make_test_findings()).unwrap();
    fs::write(&findings_path, json).unwrap();

    (config_path, findings_path)
}

#[tokio::test]
async fn test_check_from_config_file() {
    let dir = TempDir::new().unwrap();
    let (config_path, findings_path) = create_fixture(&dir);

    let config = parse_config(&config_path).await.unwrap();
    let findings = read_findings(&findings_path).await.unwrap();
    assert_eq!(findings.len(), 5);

    let output = run_check(&config.settings(), findings, OutputFormat::Json).unwrap();
    let report: serde_json::Value = serde_json::from_str(&output.report).unwrap();

    // tomcat library is outside the bug rule, and the last finding has no known library
    assert_eq!(output.active, 2);
    assert_eq!(report["active"][0]["library"], "org.apache.tomcat:tomcat-coyote:7.0.50");
    assert_eq!(report["exempted"][0]["justification"], "upload size is capped by the proxy");
    assert_eq!(report["exempted"][1]["justification"], "acme module is not deployed");
    assert_eq!(report["exempted"][2]["exemption"]["type"], "unassessed");
}

#[tokio::test]
async fn test_config_file_and_settings_store_are_equivalent() {
    let dir = TempDir::new().unwrap();
    let (config_path, _) = create_fixture(&dir);
    let config = parse_config(&config_path).await.unwrap();
    let settings = config.settings();

    let db = Database::new(dir.path().join("settings.db").to_str().unwrap()).unwrap();
    db.set_settings(&settings.to_flat_map()).unwrap();

    let from_file = ExemptionSet::from_configuration(&settings).unwrap();
    let from_store = ExemptionSet::from_map(&db.load_settings().unwrap()).unwrap();
    assert_eq!(from_file, from_store);
    assert_eq!(from_file.count(ExemptionKind::Scope), 2);

    for dep in make_test_findings() {
        assert_eq!(
            from_file.get_applicable_exemption(&dep),
            from_store.get_applicable_exemption(&dep)
        );
    }
}

#[tokio::test]
async fn test_invalid_rule_in_file_fails_load() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("bad.yaml");
    let yaml = "exemption:\n  bug:\n    - CVE-1\n    - id: ''\n      reason: forgot the id\n";
    fs::write(&config_path, yaml).unwrap();

    let err = parse_config(&config_path).await.unwrap_err();
    match err {
        ExemptorError::InvalidExemption { kind, index, .. } => {
            assert_eq!(kind, ExemptionKind::Bug);
            assert_eq!(index, Some(1));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_read_findings_rejects_malformed_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("findings.json");
    fs::write(&path, "[{\"scope\": \"/no/bug/id\"}]").unwrap();

    let err = read_findings(&path).await.unwrap_err();
    assert!(matches!(err, ExemptorError::Json(_)));
}
