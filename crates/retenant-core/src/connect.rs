//! Tenant-project connection
//!
//! Decides which tenants participate in which projects. A tenant belongs to
//! a project when any phase of any lifecycle reachable from the project (its
//! default lifecycle or a channel override) references one of the tenant's
//! source environments. Only the environments that triggered the match are
//! connected, mapped to their targets, so a tenant never gains environments
//! belonging to other projects.
//!
//! Planning is pure; applying persists widened projects before connected
//! tenants because the platform validates tenant links against the project's
//! tenancy mode.

use crate::error::MigrationError;
use indexmap::{IndexMap, IndexSet};
use retenant_client::Repository;
use retenant_map::{EnvironmentPairs, TenantGroups};
use retenant_model::{Channel, EnvironmentId, Lifecycle, LifecycleId, Project, Tenant, TenantId};

/// Entities a connection pass decided to change
///
/// `projects` hold widened tenancy modes; `tenants` hold enlarged
/// project↔environment relations. Both are full modified copies, persisted
/// once each, projects first.
#[derive(Debug, Default)]
pub struct ConnectionPlan {
    /// Projects whose tenancy mode was widened
    pub projects: Vec<Project>,
    /// Tenants that gained at least one connection
    pub tenants: Vec<Tenant>,
}

impl ConnectionPlan {
    /// Whether the pass decided to change anything
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.tenants.is_empty()
    }
}

/// Compute the connections implied by lifecycle phase membership
#[must_use]
pub fn plan_connections(
    projects: &[Project],
    channels: &[Channel],
    lifecycles: &[Lifecycle],
    groups: &TenantGroups,
    pairs: &EnvironmentPairs,
) -> ConnectionPlan {
    let lifecycles_by_id: IndexMap<&LifecycleId, &Lifecycle> =
        lifecycles.iter().map(|lifecycle| (&lifecycle.id, lifecycle)).collect();

    let mut tenants: IndexMap<TenantId, (Tenant, bool)> = groups
        .iter()
        .map(|group| (group.tenant.id.clone(), (group.tenant.clone(), false)))
        .collect();
    let mut widened = Vec::new();

    for project in projects {
        let referenced: IndexSet<&EnvironmentId> = connected_lifecycle_ids(project, channels)
            .into_iter()
            .filter_map(|id| lifecycles_by_id.get(id).copied())
            .flat_map(Lifecycle::referenced_environments)
            .collect();

        let mut gained_tenant = false;
        for group in groups.iter() {
            let matched: Vec<&EnvironmentId> = group
                .source_ids()
                .filter(|id| referenced.contains(*id))
                .collect();
            if matched.is_empty() {
                continue;
            }
            gained_tenant = true;

            let target_ids: Vec<EnvironmentId> = pairs
                .targets_for_source_ids(matched.iter().copied())
                .into_iter()
                .map(|target| target.id.clone())
                .collect();
            if let Some((tenant, changed)) = tenants.get_mut(&group.tenant.id) {
                if tenant.connect_to_project(&project.id, target_ids) {
                    tracing::debug!(
                        tenant = %tenant.name,
                        project = %project.name,
                        "connecting tenant to project"
                    );
                    *changed = true;
                }
            }
        }

        if gained_tenant {
            let mut updated = project.clone();
            if updated.widen_tenancy() {
                tracing::debug!(project = %updated.name, "widening tenancy mode");
                widened.push(updated);
            }
        }
    }

    ConnectionPlan {
        projects: widened,
        tenants: tenants
            .into_values()
            .filter_map(|(tenant, changed)| changed.then_some(tenant))
            .collect(),
    }
}

/// The project's default lifecycle plus every channel override, deduplicated
fn connected_lifecycle_ids<'a>(
    project: &'a Project,
    channels: &'a [Channel],
) -> IndexSet<&'a LifecycleId> {
    let mut ids = IndexSet::new();
    ids.insert(&project.lifecycle_id);
    for channel in channels.iter().filter(|channel| channel.project_id == project.id) {
        if let Some(lifecycle) = &channel.lifecycle_id {
            ids.insert(lifecycle);
        }
    }
    ids
}

/// Persist a plan: widened projects first, then connected tenants
pub(crate) async fn apply_connections(
    repository: &dyn Repository,
    plan: &ConnectionPlan,
) -> Result<(), MigrationError> {
    for project in &plan.projects {
        repository.modify_project(project).await?;
    }
    for tenant in &plan.tenants {
        repository.modify_tenant(tenant).await?;
    }
    Ok(())
}
