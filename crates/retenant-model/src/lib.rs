//! Retenant entity model
//!
//! Run-scoped snapshot types for the entities the reconciliation engine reads
//! from and writes back to the remote deployment platform.
//!
//! All entities are owned by the remote platform; these types are transient
//! local copies taken once per logical step. Relationship mutators
//! (connections, memberships, tenancy mode) are strictly additive so every
//! write the engine performs is safe to repeat.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod channel;
mod environment;
mod ids;
mod lifecycle;
mod machine;
mod project;
mod tenant;
mod variables;

pub use channel::Channel;
pub use environment::Environment;
pub use ids::{
    ChannelId, EnvironmentId, LibraryVariableSetId, LifecycleId, MachineId, ProjectId, TagSetId,
    TenantId,
};
pub use lifecycle::{Lifecycle, Phase};
pub use machine::Machine;
pub use project::{Project, TenantedDeploymentMode};
pub use tenant::Tenant;
pub use variables::{LibraryVariableSet, Tag, TagSet, VariableTemplate};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
