use crate::exemptions::ExemptionKind;
use crate::models::VulnerableDependency;
use super::evaluation::Evaluation;

fn describe(dep: &VulnerableDependency) -> String {
    let mut line = format!("`{}`", dep.bug_id);
    if let Some(library) = &dep.library {
        line.push_str(&format!(" in `{}`", library));
    }
    if let Some(scope) = &dep.scope {
        line.push_str(&format!(" at `{}`", scope));
    }
    line
}

pub fn format_summary(evaluation: &Evaluation) -> String {
    format!(
        "## Summary\n\n| Status | Count |\n|---|---|\n| Active | {} |\n| Exempted by bug | {} |\n| Exempted by scope | {} |\n| Exempted as unassessed | {} |\n| **Total** | **{}** |\n",
        evaluation.active.len(),
        evaluation.exempted_by(ExemptionKind::Bug),
        evaluation.exempted_by(ExemptionKind::Scope),
        evaluation.exempted_by(ExemptionKind::Unassessed),
        evaluation.total(),
    )
}

pub fn format_markdown(evaluation: &Evaluation) -> String {
    let mut report = String::from("# Vulnerable Dependency Report\n\n");
    report.push_str(&format!("_Generated {}_\n\n", evaluation.generated_at.to_rfc3339()));
    report.push_str(&format_summary(evaluation));

    report.push_str("\n## Active findings\n\n");
    if evaluation.active.is_empty() {
        report.push_str("None.\n");
    }
    for dep in &evaluation.active {
        let status = match dep.assessed {
            Some(true) => "assessed",
            Some(false) => "unassessed",
            None => "assessment unknown",
        };
        report.push_str(&format!("- {} ({})\n", describe(dep), status));
    }

    report.push_str("\n## Exempted findings\n\n");
    if evaluation.exempted.is_empty() {
        report.push_str("None.\n");
    }
    for finding in &evaluation.exempted {
        report.push_str(&format!(
            "- {} [{}]: {}\n",
            describe(&finding.dependency),
            finding.exemption.kind(),
            finding.justification,
        ));
    }
    report
}
