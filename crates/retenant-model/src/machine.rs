//! Deployment target (machine) snapshot type

use crate::ids::{EnvironmentId, MachineId, TenantId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A deployment target registered with the remote platform
///
/// Machines belong to environments and may additionally be restricted to
/// tenants. Both memberships are only ever widened by this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Machine {
    /// Remote-assigned identifier
    pub id: MachineId,
    /// Display name
    pub name: String,
    /// Environments the machine serves
    #[serde(default)]
    pub environment_ids: BTreeSet<EnvironmentId>,
    /// Tenants the machine is scoped to; empty means unrestricted
    #[serde(default)]
    pub tenant_ids: BTreeSet<TenantId>,
}

impl Machine {
    /// Create a machine snapshot with no memberships
    #[must_use]
    pub fn new(id: impl Into<MachineId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            environment_ids: BTreeSet::new(),
            tenant_ids: BTreeSet::new(),
        }
    }

    /// Fixture helper: include an environment membership
    #[must_use]
    pub fn in_environment(mut self, id: impl Into<EnvironmentId>) -> Self {
        self.environment_ids.insert(id.into());
        self
    }

    /// Add an environment membership, returning `true` if new
    pub fn add_environment(&mut self, id: EnvironmentId) -> bool {
        self.environment_ids.insert(id)
    }

    /// Add a tenant association, returning `true` if new
    pub fn add_tenant(&mut self, id: TenantId) -> bool {
        self.tenant_ids.insert(id)
    }
}
