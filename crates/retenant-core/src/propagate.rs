//! Lifecycle phase propagation
//!
//! Rewrites every lifecycle phase so the target environments implied by the
//! naming convention appear alongside the source environments already there.
//! The merge is an additive union: source references stay in place, ids the
//! map does not recognise pass through untouched, and re-running adds
//! nothing new.

use crate::error::MigrationError;
use retenant_client::Repository;
use retenant_map::EnvironmentPairs;
use retenant_model::{EnvironmentId, Lifecycle};

/// Merge mapped target environments into every phase of a lifecycle
///
/// The automatic and optional target lists are handled independently.
/// Returns `true` when any list gained an id.
pub fn propagate_phases(lifecycle: &mut Lifecycle, pairs: &EnvironmentPairs) -> bool {
    let mut changed = false;
    for phase in &mut lifecycle.phases {
        changed |= merge_mapped_targets(&mut phase.automatic_deployment_targets, pairs);
        changed |= merge_mapped_targets(&mut phase.optional_deployment_targets, pairs);
    }
    changed
}

fn merge_mapped_targets(list: &mut Vec<EnvironmentId>, pairs: &EnvironmentPairs) -> bool {
    // Ids that are not mapped sources (already-migrated targets, anything
    // else) are treated as already correct and left alone.
    let mapped: Vec<EnvironmentId> = pairs
        .targets_for_source_ids(list.iter())
        .into_iter()
        .map(|target| target.id.clone())
        .collect();

    let mut changed = false;
    for id in mapped {
        if !list.contains(&id) {
            list.push(id);
            changed = true;
        }
    }
    changed
}

/// Propagate every lifecycle, persisting each changed one exactly once
pub(crate) async fn propagate_lifecycles(
    repository: &dyn Repository,
    pairs: &EnvironmentPairs,
) -> Result<usize, MigrationError> {
    let lifecycles = repository.lifecycles().await?;
    let mut updated = 0;
    for mut lifecycle in lifecycles {
        if propagate_phases(&mut lifecycle, pairs) {
            tracing::debug!(lifecycle = %lifecycle.name, "phase targets gained mapped environments");
            repository.modify_lifecycle(&lifecycle).await?;
            updated += 1;
        }
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use retenant_map::EnvironmentMap;
    use retenant_model::{Environment, Phase};

    fn pairs() -> EnvironmentPairs {
        let sources = vec![
            Environment::new("environments-1", "Acme - Staging"),
            Environment::new("environments-2", "Acme - Production"),
        ];
        let targets = vec![
            Environment::new("environments-10", "Staging"),
            Environment::new("environments-11", "Production"),
        ];
        match EnvironmentMap::build(&sources, &targets) {
            EnvironmentMap::Complete(pairs) => pairs,
            EnvironmentMap::Incomplete { .. } => unreachable!("fixture is complete"),
        }
    }

    fn lifecycle_with(automatic: &[&str], optional: &[&str]) -> Lifecycle {
        let mut phase = Phase::new("All");
        for id in automatic {
            phase.add_automatic_target((*id).into());
        }
        for id in optional {
            phase.add_optional_target((*id).into());
        }
        Lifecycle::new("lifecycles-1", "Default").with_phase(phase)
    }

    fn ids(list: &[EnvironmentId]) -> Vec<&str> {
        list.iter().map(EnvironmentId::as_str).collect()
    }

    #[test]
    fn targets_are_added_next_to_sources() {
        let mut lifecycle = lifecycle_with(&["environments-1"], &["environments-2"]);
        assert!(propagate_phases(&mut lifecycle, &pairs()));

        let phase = &lifecycle.phases[0];
        assert_eq!(
            ids(&phase.automatic_deployment_targets),
            ["environments-1", "environments-10"]
        );
        assert_eq!(
            ids(&phase.optional_deployment_targets),
            ["environments-2", "environments-11"]
        );
    }

    #[test]
    fn unrecognised_ids_pass_through_untouched() {
        let mut lifecycle = lifecycle_with(&["environments-10", "environments-999"], &[]);
        assert!(!propagate_phases(&mut lifecycle, &pairs()));
        assert_eq!(
            ids(&lifecycle.phases[0].automatic_deployment_targets),
            ["environments-10", "environments-999"]
        );
    }

    #[test]
    fn rerun_adds_nothing() {
        let mut lifecycle = lifecycle_with(&["environments-1"], &["environments-2"]);
        assert!(propagate_phases(&mut lifecycle, &pairs()));
        let after_first = lifecycle.clone();

        assert!(!propagate_phases(&mut lifecycle, &pairs()));
        assert_eq!(lifecycle, after_first);
    }

    #[test]
    fn automatic_and_optional_lists_are_independent() {
        let mut lifecycle = lifecycle_with(&["environments-1"], &["environments-1"]);
        propagate_phases(&mut lifecycle, &pairs());

        let phase = &lifecycle.phases[0];
        assert!(phase
            .automatic_deployment_targets
            .contains(&"environments-10".into()));
        assert!(phase
            .optional_deployment_targets
            .contains(&"environments-10".into()));
    }
}
