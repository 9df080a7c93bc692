//! Convention-derived entity maps
//!
//! The legacy `"{TenantName} - {EnvironmentName}"` naming convention implies
//! two relations over a snapshot of source environments:
//!
//! - [`EnvironmentMap`]: each source paired with the target environment its
//!   name implies (many sources may share one target)
//! - [`TenantMap`]: sources grouped into the tenant their name implies
//!
//! Both maps are built fresh from snapshots and never mutated. A map is
//! either complete or it reports the missing names; lookups are only
//! reachable on the complete variant, so "create the missing entities, then
//! rebuild" is enforced by the types rather than by a runtime gate.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod environments;
mod error;
pub mod naming;
mod tenants;

pub use environments::{EnvironmentMap, EnvironmentPairs, SourceTargetPair};
pub use error::{EntityKind, MapError};
pub use tenants::{TenantGroup, TenantGroups, TenantMap};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
