//! Convention-driven tenancy reconciliation engine
//!
//! Reads the environments whose names encode the legacy
//! `"{TenantName} - {EnvironmentName}"` convention, creates the tenants and
//! target environments the convention implies, and rewires lifecycle phases,
//! project tenancy modes, tenant connections, and deployment targets so the
//! new tenants deploy exactly where the pseudo-tenant environments did.
//!
//! Every relationship write is an additive merge and every created entity is
//! keyed by name, so the whole run is idempotent: re-running against
//! unchanged input is a no-op at the remote layer.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod connect;
mod conventions;
mod error;
mod filter;
mod machines;
mod migration;
mod propagate;

pub use connect::{plan_connections, ConnectionPlan};
pub use conventions::{
    alias_of, region_of, ALIAS_VARIABLE, PASSWORD_VARIABLE, REGIONS, REGION_TAG_SET,
    REGION_VARIABLE, VARIABLE_SET,
};
pub use error::MigrationError;
pub use filter::SourceFilter;
pub use machines::repoint_machine;
pub use migration::{Migration, MigrationOptions, MigrationReport};
pub use propagate::propagate_phases;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
