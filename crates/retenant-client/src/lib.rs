//! Remote repository client
//!
//! The deployment platform owns every entity; the [`Repository`] trait is the
//! reconciliation engine's whole window onto it: full-snapshot reads,
//! idempotent name-keyed upserts, in-place modifies. [`HttpRepository`] talks
//! to a real server; [`InMemoryRepository`] reproduces the same semantics
//! in-process for tests and rehearsals.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod http;
mod memory;
mod repository;

pub use http::HttpRepository;
pub use memory::InMemoryRepository;
pub use repository::{ClientError, Repository};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
