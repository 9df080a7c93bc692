//! Deployment target re-pointing
//!
//! Machines registered in a source environment gain the mapped target
//! environment and the tenants derived from that same source. Existing
//! memberships are never removed, so the pass is safe to repeat.

use crate::error::MigrationError;
use retenant_client::Repository;
use retenant_map::{EnvironmentPairs, TenantGroups};
use retenant_model::{EnvironmentId, Machine};

/// Merge mapped environments and tenants into one machine's memberships
///
/// Returns `true` when the machine gained anything.
pub fn repoint_machine(
    machine: &mut Machine,
    pairs: &EnvironmentPairs,
    groups: &TenantGroups,
) -> bool {
    let source_ids: Vec<EnvironmentId> = machine
        .environment_ids
        .iter()
        .filter(|id| pairs.contains_source(id))
        .cloned()
        .collect();
    if source_ids.is_empty() {
        return false;
    }

    let mut changed = false;
    for target in pairs.targets_for_source_ids(source_ids.iter()) {
        changed |= machine.add_environment(target.id.clone());
    }
    for tenant in groups.tenants_for_source_ids(source_ids.iter()) {
        changed |= machine.add_tenant(tenant.id.clone());
    }
    changed
}

/// Re-point every machine, persisting each changed one exactly once
pub(crate) async fn repoint_machines(
    repository: &dyn Repository,
    pairs: &EnvironmentPairs,
    groups: &TenantGroups,
) -> Result<usize, MigrationError> {
    let machines = repository.machines().await?;
    let mut updated = 0;
    for mut machine in machines {
        if repoint_machine(&mut machine, pairs, groups) {
            tracing::debug!(machine = %machine.name, "re-pointing deployment target");
            repository.modify_machine(&machine).await?;
            updated += 1;
        }
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use retenant_map::{EnvironmentMap, TenantMap};
    use retenant_model::{Environment, Tenant, TenantId};

    fn sources() -> Vec<Environment> {
        vec![
            Environment::new("environments-1", "Acme - Staging"),
            Environment::new("environments-2", "Acme - Production"),
        ]
    }

    fn pairs() -> EnvironmentPairs {
        let targets = vec![
            Environment::new("environments-10", "Staging"),
            Environment::new("environments-11", "Production"),
        ];
        match EnvironmentMap::build(&sources(), &targets) {
            EnvironmentMap::Complete(pairs) => pairs,
            EnvironmentMap::Incomplete { .. } => unreachable!("fixture is complete"),
        }
    }

    fn groups() -> TenantGroups {
        let tenants = vec![Tenant::new("tenants-1", "Acme")];
        match TenantMap::build(&sources(), &tenants) {
            TenantMap::Complete(groups) => groups,
            TenantMap::Incomplete { .. } => unreachable!("fixture is complete"),
        }
    }

    #[test]
    fn machine_gains_target_environment_and_tenant() {
        let mut machine = Machine::new("machines-1", "web-01").in_environment("environments-1");
        assert!(repoint_machine(&mut machine, &pairs(), &groups()));

        let staging_target = EnvironmentId::from("environments-10");
        let acme = TenantId::from("tenants-1");
        assert!(machine.environment_ids.contains(&staging_target));
        assert!(machine.tenant_ids.contains(&acme));
        // Original membership is kept.
        assert!(machine
            .environment_ids
            .contains(&EnvironmentId::from("environments-1")));
    }

    #[test]
    fn machine_outside_any_source_environment_is_untouched() {
        let mut machine = Machine::new("machines-1", "db-01").in_environment("environments-42");
        assert!(!repoint_machine(&mut machine, &pairs(), &groups()));
        assert!(machine.tenant_ids.is_empty());
    }

    #[test]
    fn rerun_adds_nothing() {
        let mut machine = Machine::new("machines-1", "web-01").in_environment("environments-1");
        repoint_machine(&mut machine, &pairs(), &groups());
        let after_first = machine.clone();

        assert!(!repoint_machine(&mut machine, &pairs(), &groups()));
        assert_eq!(machine, after_first);
    }
}
