//! Typed identifiers for remote-owned entities
//!
//! Every id is an opaque string assigned by the remote platform. Newtypes
//! keep an environment id from ever being handed to a tenant lookup.

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// View the raw id string
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }
    };
}

entity_id! {
    /// Identifier of an environment (source or target)
    EnvironmentId
}

entity_id! {
    /// Identifier of a tenant
    TenantId
}

entity_id! {
    /// Identifier of a project
    ProjectId
}

entity_id! {
    /// Identifier of a lifecycle
    LifecycleId
}

entity_id! {
    /// Identifier of a channel
    ChannelId
}

entity_id! {
    /// Identifier of a deployment target (machine)
    MachineId
}

entity_id! {
    /// Identifier of a tag set
    TagSetId
}

entity_id! {
    /// Identifier of a library variable set
    LibraryVariableSetId
}
