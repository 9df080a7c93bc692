//! Repository trait and client error type
//!
//! The remote platform owns every entity; this trait is the engine's whole
//! window onto it. Reads are full snapshots, `create_or_modify_*` are
//! idempotent name-keyed upserts, `modify_*` are in-place updates of mutable
//! fields. Failures propagate synchronously; there is no retry layer.

use async_trait::async_trait;
use retenant_model::{
    Channel, Environment, LibraryVariableSet, Lifecycle, Machine, Project, TagSet, Tenant,
};

/// Errors surfaced by repository implementations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (connection, TLS, body decoding)
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote API answered with a non-success status
    #[error("{method} {path} rejected by remote API ({status}): {message}")]
    Api {
        /// HTTP method attempted
        method: &'static str,
        /// Request path
        path: String,
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        message: String,
    },

    /// A `modify_*` call referenced an id the repository does not hold
    #[error("unknown {kind} id: {id}")]
    UnknownId {
        /// Entity kind, e.g. `"lifecycle"`
        kind: &'static str,
        /// The unrecognised id
        id: String,
    },

    /// The platform rejected an entity state transition
    ///
    /// Tenant↔project links in particular are validated against the
    /// project's current tenancy mode, so projects must be widened before
    /// tenants are saved.
    #[error("validation rejected: {0}")]
    Validation(String),
}

/// Case-insensitive name equality, the platform's upsert key
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Capability object over the remote platform's entity collections
#[async_trait]
pub trait Repository: Send + Sync {
    /// Full environment snapshot
    async fn environments(&self) -> Result<Vec<Environment>, ClientError>;

    /// Full tenant snapshot
    async fn tenants(&self) -> Result<Vec<Tenant>, ClientError>;

    /// Full project snapshot
    async fn projects(&self) -> Result<Vec<Project>, ClientError>;

    /// Full lifecycle snapshot
    async fn lifecycles(&self) -> Result<Vec<Lifecycle>, ClientError>;

    /// Full channel snapshot
    async fn channels(&self) -> Result<Vec<Channel>, ClientError>;

    /// Full deployment target snapshot
    async fn machines(&self) -> Result<Vec<Machine>, ClientError>;

    /// Full tag set snapshot
    async fn tag_sets(&self) -> Result<Vec<TagSet>, ClientError>;

    /// Full library variable set snapshot
    async fn library_variable_sets(&self) -> Result<Vec<LibraryVariableSet>, ClientError>;

    /// Upsert an environment by name (case-insensitive)
    async fn create_or_modify_environment(&self, name: &str) -> Result<Environment, ClientError>;

    /// Upsert a tenant by name (case-insensitive)
    async fn create_or_modify_tenant(&self, name: &str) -> Result<Tenant, ClientError>;

    /// Upsert a tag set by name (case-insensitive)
    async fn create_or_modify_tag_set(&self, name: &str) -> Result<TagSet, ClientError>;

    /// Upsert a library variable set by name (case-insensitive)
    async fn create_or_modify_library_variable_set(
        &self,
        name: &str,
    ) -> Result<LibraryVariableSet, ClientError>;

    /// Replace a lifecycle's mutable fields
    async fn modify_lifecycle(&self, lifecycle: &Lifecycle) -> Result<(), ClientError>;

    /// Replace a project's mutable fields
    async fn modify_project(&self, project: &Project) -> Result<(), ClientError>;

    /// Replace a tenant's mutable fields
    async fn modify_tenant(&self, tenant: &Tenant) -> Result<(), ClientError>;

    /// Replace a machine's mutable fields
    async fn modify_machine(&self, machine: &Machine) -> Result<(), ClientError>;

    /// Replace a tag set's mutable fields
    async fn modify_tag_set(&self, tag_set: &TagSet) -> Result<(), ClientError>;

    /// Replace a library variable set's mutable fields
    async fn modify_library_variable_set(
        &self,
        set: &LibraryVariableSet,
    ) -> Result<(), ClientError>;
}
