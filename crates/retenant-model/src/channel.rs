//! Channel snapshot type

use crate::ids::{ChannelId, LifecycleId, ProjectId};
use serde::{Deserialize, Serialize};

/// A release channel belonging to a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Channel {
    /// Remote-assigned identifier
    pub id: ChannelId,
    /// Display name
    pub name: String,
    /// Owning project
    pub project_id: ProjectId,
    /// Lifecycle override; `None` means the project default applies
    #[serde(default)]
    pub lifecycle_id: Option<LifecycleId>,
}

impl Channel {
    /// Create a channel that follows the project's default lifecycle
    #[must_use]
    pub fn new(
        id: impl Into<ChannelId>,
        name: impl Into<String>,
        project: impl Into<ProjectId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            project_id: project.into(),
            lifecycle_id: None,
        }
    }

    /// Override the lifecycle for this channel
    #[must_use]
    pub fn with_lifecycle(mut self, lifecycle: impl Into<LifecycleId>) -> Self {
        self.lifecycle_id = Some(lifecycle.into());
        self
    }
}
