use std::path::Path;
use crate::cli::commands::CheckArgs;
use crate::cli::load_optional_config;
use crate::config::{OutputFormat, Settings};
use crate::db::Database;
use crate::errors::ExemptorError;
use crate::exemptions::ExemptionSet;
use crate::models::VulnerableDependency;
use crate::reporting::{evaluate, format_markdown};
use tracing::info;

pub async fn handle_check(args: CheckArgs) -> Result<(), ExemptorError> {
    let config = load_optional_config(args.config.as_deref()).await?;

    let mut settings = config.as_ref().map(|c| c.settings()).unwrap_or_default();
    let db_path = args.db.as_deref().or_else(|| config.as_ref().and_then(|c| c.database_path()));
    if let Some(path) = db_path {
        let stored = Database::new(path)?.load_settings()?;
        settings.overlay(&stored);
    }

    let format = match &args.format {
        Some(f) => f.parse::<OutputFormat>().map_err(ExemptorError::Config)?,
        None => config.as_ref().map(|c| c.output_format()).unwrap_or_default(),
    };

    let findings = read_findings(Path::new(&args.findings)).await?;
    let output = run_check(&settings, findings, format)?;
    println!("{}", output.report);

    if args.fail_on_active && output.active > 0 {
        return Err(ExemptorError::ActiveFindings(output.active));
    }
    Ok(())
}

pub struct CheckOutput {
    pub report: String,
    pub active: usize,
}

/// Build the exemption set from `settings` and render the evaluation of `findings`.
pub fn run_check(
    settings: &Settings,
    findings: Vec<VulnerableDependency>,
    format: OutputFormat,
) -> Result<CheckOutput, ExemptorError> {
    let set = ExemptionSet::from_configuration(settings)?;
    info!(exemptions = set.len(), findings = findings.len(), "Checking findings");

    let evaluation = evaluate(&set, findings);
    let report = match format {
        OutputFormat::Markdown => format_markdown(&evaluation),
        OutputFormat::Json => serde_json::to_string_pretty(&evaluation)?,
    };
    Ok(CheckOutput { report, active: evaluation.active.len() })
}

pub async fn read_findings(path: &Path) -> Result<Vec<VulnerableDependency>, ExemptorError> {
    if !path.exists() {
        return Err(ExemptorError::Config(format!("Findings file not found: {}", path.display())));
    }
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}
