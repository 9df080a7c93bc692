//! Environment snapshot type

use crate::ids::EnvironmentId;
use serde::{Deserialize, Serialize};

/// An environment as reported by the remote platform
///
/// Under the legacy convention the display name encodes
/// `"{TenantName} - {EnvironmentName}"`; migrated target environments carry
/// just the environment portion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Environment {
    /// Remote-assigned identifier
    pub id: EnvironmentId,
    /// Display name
    pub name: String,
}

impl Environment {
    /// Create an environment snapshot
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<EnvironmentId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
