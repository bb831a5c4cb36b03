use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::exemptions::{Exemption, ExemptionKind, ExemptionSet};
use crate::models::VulnerableDependency;

/// A finding suppressed by an exemption, with the rule kept for audit.
#[derive(Debug, Clone, Serialize)]
pub struct ExemptedFinding {
    pub dependency: VulnerableDependency,
    pub exemption: Exemption,
    pub justification: String,
}

/// Result of checking a batch of findings against an exemption set.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub generated_at: DateTime<Utc>,
    pub active: Vec<VulnerableDependency>,
    pub exempted: Vec<ExemptedFinding>,
}

impl Evaluation {
    pub fn total(&self) -> usize {
        self.active.len() + self.exempted.len()
    }

    /// Number of findings suppressed by rules of the given kind.
    pub fn exempted_by(&self, kind: ExemptionKind) -> usize {
        self.exempted.iter().filter(|f| f.exemption.kind() == kind).count()
    }
}

/// Split `findings` into active and exempted, preserving input order.
pub fn evaluate(set: &ExemptionSet, findings: Vec<VulnerableDependency>) -> Evaluation {
    let mut active = Vec::new();
    let mut exempted = Vec::new();

    for dependency in findings {
        match set.get_applicable_exemption(&dependency) {
            Some(exemption) => {
                debug!(bug_id = %dependency.bug_id, rule = %exemption, "Finding exempted");
                exempted.push(ExemptedFinding {
                    justification: exemption.justification(),
                    exemption: exemption.clone(),
                    dependency,
                });
            }
            None => active.push(dependency),
        }
    }

    info!(active = active.len(), exempted = exempted.len(), "Evaluated findings");
    Evaluation { generated_at: Utc::now(), active, exempted }
}
