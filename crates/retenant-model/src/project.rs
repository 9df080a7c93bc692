//! Project snapshot type and tenancy mode

use crate::ids::{LifecycleId, ProjectId};
use serde::{Deserialize, Serialize};

/// How a project accepts deployments with respect to tenants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TenantedDeploymentMode {
    /// Untenanted deployments only
    #[default]
    Untenanted,
    /// Both tenanted and untenanted deployments
    TenantedOrUntenanted,
    /// Tenanted deployments only
    Tenanted,
}

impl TenantedDeploymentMode {
    /// Whether tenants may be linked to a project in this mode
    #[inline]
    #[must_use]
    pub fn allows_tenants(self) -> bool {
        !matches!(self, Self::Untenanted)
    }
}

/// A project as reported by the remote platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Project {
    /// Remote-assigned identifier
    pub id: ProjectId,
    /// Display name
    pub name: String,
    /// Default lifecycle
    pub lifecycle_id: LifecycleId,
    /// Current tenancy mode
    #[serde(default)]
    pub tenanted_deployment_mode: TenantedDeploymentMode,
}

impl Project {
    /// Create a project snapshot in the default (untenanted) mode
    #[must_use]
    pub fn new(
        id: impl Into<ProjectId>,
        name: impl Into<String>,
        lifecycle: impl Into<LifecycleId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lifecycle_id: lifecycle.into(),
            tenanted_deployment_mode: TenantedDeploymentMode::default(),
        }
    }

    /// Widen the tenancy mode so tenant links pass remote validation
    ///
    /// `Untenanted` becomes `TenantedOrUntenanted`; the two tenant-accepting
    /// modes are left alone. Returns `true` if the mode changed.
    pub fn widen_tenancy(&mut self) -> bool {
        if self.tenanted_deployment_mode == TenantedDeploymentMode::Untenanted {
            self.tenanted_deployment_mode = TenantedDeploymentMode::TenantedOrUntenanted;
            true
        } else {
            false
        }
    }
}
