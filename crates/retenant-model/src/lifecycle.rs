//! Lifecycle and phase snapshot types

use crate::ids::{EnvironmentId, LifecycleId};
use serde::{Deserialize, Serialize};

/// One ordered stage of a deployment pipeline
///
/// A phase holds two environment reference lists: targets deployed to
/// automatically and targets an operator may opt into. Both lists may mix
/// legacy source-environment ids and already-migrated target ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Phase {
    /// Display name
    pub name: String,
    /// Environments deployed to automatically
    #[serde(default)]
    pub automatic_deployment_targets: Vec<EnvironmentId>,
    /// Environments an operator may deploy to on demand
    #[serde(default)]
    pub optional_deployment_targets: Vec<EnvironmentId>,
}

impl Phase {
    /// Create an empty phase
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            automatic_deployment_targets: Vec::new(),
            optional_deployment_targets: Vec::new(),
        }
    }

    /// Append to the automatic list unless already present
    pub fn add_automatic_target(&mut self, id: EnvironmentId) -> bool {
        push_unique(&mut self.automatic_deployment_targets, id)
    }

    /// Append to the optional list unless already present
    pub fn add_optional_target(&mut self, id: EnvironmentId) -> bool {
        push_unique(&mut self.optional_deployment_targets, id)
    }
}

/// Ordered sequence of phases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Lifecycle {
    /// Remote-assigned identifier
    pub id: LifecycleId,
    /// Display name
    pub name: String,
    /// Phases in pipeline order
    #[serde(default)]
    pub phases: Vec<Phase>,
}

impl Lifecycle {
    /// Create a lifecycle snapshot with no phases
    #[must_use]
    pub fn new(id: impl Into<LifecycleId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phases: Vec::new(),
        }
    }

    /// Append a phase, returning `self` for fixture building
    #[must_use]
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phases.push(phase);
        self
    }

    /// Every environment id referenced by any phase, duplicates included
    pub fn referenced_environments(&self) -> impl Iterator<Item = &EnvironmentId> {
        self.phases.iter().flat_map(|phase| {
            phase
                .automatic_deployment_targets
                .iter()
                .chain(phase.optional_deployment_targets.iter())
        })
    }
}

fn push_unique(list: &mut Vec<EnvironmentId>, id: EnvironmentId) -> bool {
    if list.contains(&id) {
        false
    } else {
        list.push(id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_target_preserves_order_and_dedups() {
        let mut phase = Phase::new("Production");
        assert!(phase.add_automatic_target("environments-1".into()));
        assert!(phase.add_automatic_target("environments-2".into()));
        assert!(!phase.add_automatic_target("environments-1".into()));

        let ids: Vec<&str> = phase
            .automatic_deployment_targets
            .iter()
            .map(EnvironmentId::as_str)
            .collect();
        assert_eq!(ids, ["environments-1", "environments-2"]);
    }

    #[test]
    fn automatic_and_optional_lists_are_independent() {
        let mut phase = Phase::new("Staging");
        phase.add_automatic_target("environments-1".into());
        assert!(phase.add_optional_target("environments-1".into()));
    }

    #[test]
    fn referenced_environments_walks_both_lists() {
        let mut phase = Phase::new("Any");
        phase.add_automatic_target("environments-1".into());
        phase.add_optional_target("environments-2".into());
        let lifecycle = Lifecycle::new("lifecycles-1", "Default").with_phase(phase);

        let refs: Vec<&str> = lifecycle
            .referenced_environments()
            .map(EnvironmentId::as_str)
            .collect();
        assert_eq!(refs, ["environments-1", "environments-2"]);
    }
}
