//! Tenant snapshot type and its additive connection helpers

use crate::ids::{EnvironmentId, ProjectId, TenantId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A tenant as reported by the remote platform
///
/// `project_environments` is the tenant's project↔environment relation: the
/// set of environments the tenant may be deployed to, per project. The
/// relation is only ever widened by this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tenant {
    /// Remote-assigned identifier
    pub id: TenantId,
    /// Display name (the derived `{TenantName}` portion)
    pub name: String,
    /// Canonical tag names applied to this tenant
    #[serde(default)]
    pub tenant_tags: BTreeSet<String>,
    /// Project id → environments the tenant is connected to for that project
    #[serde(default)]
    pub project_environments: BTreeMap<ProjectId, BTreeSet<EnvironmentId>>,
    /// Default variable values keyed by template name
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl Tenant {
    /// Create a tenant snapshot with no connections
    #[must_use]
    pub fn new(id: impl Into<TenantId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tenant_tags: BTreeSet::new(),
            project_environments: BTreeMap::new(),
            variables: BTreeMap::new(),
        }
    }

    /// Merge a project/environment connection into the relation
    ///
    /// Additive: environments already connected for the project are kept,
    /// other projects are untouched. Returns `true` if anything was added.
    pub fn connect_to_project<I>(&mut self, project: &ProjectId, environments: I) -> bool
    where
        I: IntoIterator<Item = EnvironmentId>,
    {
        let connected = self.project_environments.entry(project.clone()).or_default();
        let before = connected.len();
        connected.extend(environments);
        connected.len() > before
    }

    /// Whether the tenant has any project connection at all
    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.project_environments
            .values()
            .any(|envs| !envs.is_empty())
    }

    /// Apply a canonical tag, returning `true` if it was not present
    pub fn apply_tag(&mut self, canonical: impl Into<String>) -> bool {
        self.tenant_tags.insert(canonical.into())
    }

    /// Set a default variable value only when absent
    ///
    /// Returns `true` if the value was written.
    pub fn set_variable_if_absent(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        match self.variables.entry(name.into()) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(value.into());
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }
}
