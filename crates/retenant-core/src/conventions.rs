//! Convention-driven tenant setup
//!
//! Seeds the region tag set and the shared variable templates, then fills
//! per-tenant defaults: an alias derived from the tenant name, a region
//! assigned by a stable hash of the name, and a generated password. Values
//! are only written when absent, so re-runs never rotate credentials or
//! reshuffle regions.

use crate::error::MigrationError;
use rand::distr::Alphanumeric;
use rand::Rng;
use retenant_client::Repository;
use retenant_map::TenantGroups;
use retenant_model::VariableTemplate;

/// Tag set every tenant is tagged from
pub const REGION_TAG_SET: &str = "Regions";

/// Regions tenants are spread across
pub const REGIONS: [&str; 5] = ["us-east", "us-west", "eu-west", "eu-central", "ap-southeast"];

/// Library variable set carrying the tenant templates
pub const VARIABLE_SET: &str = "Tenant Defaults";

/// Variable holding the tenant's short alias
pub const ALIAS_VARIABLE: &str = "Tenant.Alias";

/// Variable holding the tenant's assigned region
pub const REGION_VARIABLE: &str = "Tenant.Region";

/// Variable holding the tenant's generated password
pub const PASSWORD_VARIABLE: &str = "Tenant.Password";

const PASSWORD_LENGTH: usize = 20;

/// Region assigned to a tenant name
///
/// FNV-1a over the folded name, so the assignment is stable across runs and
/// insensitive to name casing.
#[must_use]
pub fn region_of(tenant_name: &str) -> &'static str {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in tenant_name.trim().to_lowercase().bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    REGIONS[usize::try_from(hash % REGIONS.len() as u64).unwrap_or(0)]
}

/// Alias derived from a tenant name: lowercase, runs of other characters
/// collapsed to single dashes
#[must_use]
pub fn alias_of(tenant_name: &str) -> String {
    let mut alias = String::with_capacity(tenant_name.len());
    let mut pending_dash = false;
    for ch in tenant_name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !alias.is_empty() {
                alias.push('-');
            }
            pending_dash = false;
            alias.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    alias
}

fn generate_password() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

/// Ensure the tag set, the variable templates, and per-tenant defaults
///
/// Operates on a fresh tenant snapshot and touches only tenants the map
/// derived. Returns how many tenants were persisted.
pub(crate) async fn ensure_conventions(
    repository: &dyn Repository,
    groups: &TenantGroups,
) -> Result<usize, MigrationError> {
    let mut tag_set = repository.create_or_modify_tag_set(REGION_TAG_SET).await?;
    let mut changed = false;
    for region in REGIONS {
        changed |= tag_set.ensure_tag(region);
    }
    if changed {
        repository.modify_tag_set(&tag_set).await?;
    }

    let mut variable_set = repository
        .create_or_modify_library_variable_set(VARIABLE_SET)
        .await?;
    let mut changed = false;
    changed |= variable_set.ensure_template(VariableTemplate::new(ALIAS_VARIABLE, "Tenant alias"));
    changed |= variable_set.ensure_template(VariableTemplate::new(REGION_VARIABLE, "Tenant region"));
    changed |=
        variable_set.ensure_template(VariableTemplate::new(PASSWORD_VARIABLE, "Tenant password"));
    if changed {
        repository.modify_library_variable_set(&variable_set).await?;
    }

    let tenants = repository.tenants().await?;
    let mut configured = 0;
    for mut tenant in tenants {
        if groups.group_for_tenant_id(&tenant.id).is_none() {
            continue;
        }
        let region = region_of(&tenant.name);
        let mut changed = false;
        if let Some(canonical) = tag_set.canonical_name_of(region) {
            changed |= tenant.apply_tag(canonical);
        }
        changed |= tenant.set_variable_if_absent(ALIAS_VARIABLE, alias_of(&tenant.name));
        changed |= tenant.set_variable_if_absent(REGION_VARIABLE, region);
        changed |= tenant.set_variable_if_absent(PASSWORD_VARIABLE, generate_password());
        if changed {
            tracing::debug!(tenant = %tenant.name, region, "applying convention defaults");
            repository.modify_tenant(&tenant).await?;
            configured += 1;
        }
    }
    Ok(configured)
}
