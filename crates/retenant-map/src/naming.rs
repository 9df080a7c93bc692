//! Naming convention resolver
//!
//! The legacy convention encodes `"{TenantName} - {EnvironmentName}"` in an
//! environment's display name. Both resolvers are pure and total: any string
//! is valid input, including strings with no separator at all.

/// Environment name assumed when a source name carries no separator
pub const DEFAULT_TARGET_ENVIRONMENT: &str = "Production";

/// Tenant portion of a source environment name
///
/// Everything before the first `-`, trimmed; the whole trimmed name when no
/// separator is present.
#[must_use]
pub fn tenant_name_of(name: &str) -> String {
    match name.split_once('-') {
        Some((tenant, _)) => tenant.trim().to_string(),
        None => name.trim().to_string(),
    }
}

/// Environment portion of a source environment name
///
/// Everything after the first `-`, trimmed; the literal
/// [`DEFAULT_TARGET_ENVIRONMENT`] when no separator is present.
#[must_use]
pub fn target_environment_name_of(name: &str) -> String {
    match name.split_once('-') {
        Some((_, environment)) => environment.trim().to_string(),
        None => DEFAULT_TARGET_ENVIRONMENT.to_string(),
    }
}

/// Case-insensitive comparison key for entity names
pub(crate) fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
