use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::{Exemption, ExemptionBug, ExemptionKind, ExemptionScope, ExemptionUnassessed};
use crate::config::source::ConfigSource;
use crate::errors::ExemptorError;
use crate::models::VulnerableDependency;

/// An immutable, duplicate-free collection of exemption rules.
///
/// Rules are kept in a fixed order: bug rules by index, then scope rules by
/// index, then the unassessed rule. Lookups return the first match in that
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExemptionSet {
    exemptions: Vec<Exemption>,
}

impl ExemptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_unique(&mut self, exemption: Exemption) {
        if !self.exemptions.contains(&exemption) {
            self.exemptions.push(exemption);
        }
    }

    /// Returns the first rule that exempts `dep`, if any.
    pub fn get_applicable_exemption(&self, dep: &VulnerableDependency) -> Option<&Exemption> {
        if self.exemptions.is_empty() {
            return None;
        }
        self.exemptions.iter().find(|e| e.is_exempted(dep))
    }

    /// Build the set from a structured configuration source.
    ///
    /// Any malformed rule fails the whole call; no partial set is returned.
    pub fn from_configuration<S: ConfigSource + ?Sized>(source: &S) -> Result<Self, ExemptorError> {
        let bugs = ExemptionBug::read_from_configuration(source)?;
        let scopes = ExemptionScope::read_from_configuration(source)?;
        let unassessed = ExemptionUnassessed::read_from_configuration(source)?;

        let set: Self = bugs
            .into_iter()
            .map(Exemption::from)
            .chain(scopes.into_iter().map(Exemption::from))
            .chain(unassessed.into_iter().map(Exemption::from))
            .collect();

        debug!(
            total = set.len(),
            bug = set.count(ExemptionKind::Bug),
            scope = set.count(ExemptionKind::Scope),
            unassessed = set.count(ExemptionKind::Unassessed),
            "Built exemption set"
        );
        Ok(set)
    }

    /// Build the set from a flat key/value map using the same keys as
    /// [`ExemptionSet::from_configuration`].
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, ExemptorError> {
        Self::from_configuration(map)
    }

    pub fn len(&self) -> usize {
        self.exemptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exemptions.is_empty()
    }

    /// Number of rules of the given kind.
    pub fn count(&self, kind: ExemptionKind) -> usize {
        self.exemptions.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Exemption> {
        self.exemptions.iter()
    }
}

impl FromIterator<Exemption> for ExemptionSet {
    fn from_iter<I: IntoIterator<Item = Exemption>>(iter: I) -> Self {
        let mut set = Self::new();
        for exemption in iter {
            set.push_unique(exemption);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ExemptionSet {
    type Item = &'a Exemption;
    type IntoIter = std::slice::Iter<'a, Exemption>;

    fn into_iter(self) -> Self::IntoIter {
        self.exemptions.iter()
    }
}
