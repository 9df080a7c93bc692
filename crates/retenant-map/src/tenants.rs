//! Source-environment-to-tenant map
//!
//! Groups source environments by the tenant name their display name implies.
//! Unlike the environment map this is a true group-by: every source
//! environment sharing a derived tenant name associates with the one tenant
//! entity of that name.

use crate::error::{EntityKind, MapError};
use crate::naming::{name_key, tenant_name_of};
use indexmap::IndexMap;
use retenant_model::{Environment, EnvironmentId, Tenant, TenantId};

/// One tenant together with every source environment that derives its name
#[derive(Debug, Clone)]
pub struct TenantGroup {
    /// The tenant entity
    pub tenant: Tenant,
    /// Source environments whose derived tenant name matches, snapshot order
    pub source_environments: Vec<Environment>,
}

impl TenantGroup {
    /// Ids of the group's source environments, snapshot order
    pub fn source_ids(&self) -> impl Iterator<Item = &EnvironmentId> {
        self.source_environments.iter().map(|env| &env.id)
    }
}

/// Outcome of grouping source environments into tenants
#[derive(Debug, Clone)]
pub enum TenantMap {
    /// Some derived tenant names have no tenant yet
    Incomplete {
        /// Missing names, distinct and sorted
        missing_tenant_names: Vec<String>,
    },
    /// Every derived tenant name resolved to a tenant
    Complete(TenantGroups),
}

impl TenantMap {
    /// Group a source snapshot against the existing tenant snapshot
    ///
    /// Tenant names are matched case-insensitively; groups come out sorted by
    /// folded name so rebuilding from identical snapshots is deterministic.
    #[must_use]
    pub fn build(source_environments: &[Environment], existing_tenants: &[Tenant]) -> Self {
        let mut grouped: IndexMap<String, (String, Vec<Environment>)> = IndexMap::new();
        for source in source_environments {
            let derived = tenant_name_of(&source.name);
            grouped
                .entry(name_key(&derived))
                .or_insert_with(|| (derived, Vec::new()))
                .1
                .push(source.clone());
        }
        grouped.sort_keys();

        let mut existing_by_key: IndexMap<String, &Tenant> = IndexMap::new();
        for tenant in existing_tenants {
            existing_by_key
                .entry(name_key(&tenant.name))
                .or_insert(tenant);
        }

        let missing_tenant_names: Vec<String> = grouped
            .iter()
            .filter(|(key, _)| !existing_by_key.contains_key(key.as_str()))
            .map(|(_, (name, _))| name.clone())
            .collect();
        if !missing_tenant_names.is_empty() {
            return Self::Incomplete {
                missing_tenant_names,
            };
        }

        let mut groups = Vec::with_capacity(grouped.len());
        let mut by_tenant_id = IndexMap::new();
        let mut by_source_id = IndexMap::new();
        for (key, (_, source_environments)) in grouped {
            let tenant = existing_by_key[key.as_str()].clone();
            let index = groups.len();
            by_tenant_id.insert(tenant.id.clone(), index);
            for source in &source_environments {
                by_source_id.insert(source.id.clone(), index);
            }
            groups.push(TenantGroup {
                tenant,
                source_environments,
            });
        }

        Self::Complete(TenantGroups {
            groups,
            by_tenant_id,
            by_source_id,
        })
    }

    /// Derived tenant names that have no tenant yet
    #[must_use]
    pub fn missing_tenant_names(&self) -> &[String] {
        match self {
            Self::Incomplete {
                missing_tenant_names,
            } => missing_tenant_names,
            Self::Complete(_) => &[],
        }
    }

    /// Whether every derived tenant name resolved
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    /// Access the groups, or fail with the missing-name diagnostic
    pub fn complete(&self) -> Result<&TenantGroups, MapError> {
        match self {
            Self::Complete(groups) => Ok(groups),
            Self::Incomplete {
                missing_tenant_names,
            } => Err(MapError::EntitiesMissing {
                kind: EntityKind::Tenant,
                missing: missing_tenant_names.clone(),
            }),
        }
    }

    /// Every tenant in the map, one per derived tenant name
    pub fn all_tenants(&self) -> Result<Vec<&Tenant>, MapError> {
        Ok(self.complete()?.iter().map(|group| &group.tenant).collect())
    }

    /// Tenant a source environment belongs to
    pub fn tenant_for_source_id(&self, id: &EnvironmentId) -> Result<Option<&Tenant>, MapError> {
        Ok(self.complete()?.tenant_for_source_id(id))
    }
}

/// The complete tenant grouping
#[derive(Debug, Clone)]
pub struct TenantGroups {
    groups: Vec<TenantGroup>,
    by_tenant_id: IndexMap<TenantId, usize>,
    by_source_id: IndexMap<EnvironmentId, usize>,
}

impl TenantGroups {
    /// Number of distinct tenants
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the grouping is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate groups in sorted-name order
    pub fn iter(&self) -> impl Iterator<Item = &TenantGroup> {
        self.groups.iter()
    }

    /// Tenant a source environment belongs to
    #[must_use]
    pub fn tenant_for_source_id(&self, id: &EnvironmentId) -> Option<&Tenant> {
        self.by_source_id
            .get(id)
            .map(|&index| &self.groups[index].tenant)
    }

    /// Group for a tenant id
    #[must_use]
    pub fn group_for_tenant_id(&self, id: &TenantId) -> Option<&TenantGroup> {
        self.by_tenant_id.get(id).map(|&index| &self.groups[index])
    }

    /// Distinct tenants for the given source ids
    ///
    /// Unrecognised ids are skipped; order follows the input, first
    /// occurrence wins.
    #[must_use]
    pub fn tenants_for_source_ids<'a, I>(&self, ids: I) -> Vec<&Tenant>
    where
        I: IntoIterator<Item = &'a EnvironmentId>,
    {
        let mut seen = Vec::new();
        let mut tenants = Vec::new();
        for id in ids {
            if let Some(tenant) = self.tenant_for_source_id(id) {
                if !seen.contains(&&tenant.id) {
                    seen.push(&tenant.id);
                    tenants.push(tenant);
                }
            }
        }
        tenants
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(id: &str, name: &str) -> Environment {
        Environment::new(id, name)
    }

    fn sources() -> Vec<Environment> {
        vec![
            env("environments-1", "Acme - Staging"),
            env("environments-2", "Acme - Production"),
            env("environments-3", "Globex"),
        ]
    }

    #[test]
    fn missing_tenants_are_distinct_and_sorted() {
        let map = TenantMap::build(&sources(), &[]);
        assert!(!map.is_complete());
        assert_eq!(map.missing_tenant_names(), ["Acme", "Globex"]);
    }

    #[test]
    fn incomplete_map_fails_every_lookup() {
        let map = TenantMap::build(&sources(), &[]);
        let err = map.all_tenants().unwrap_err();
        assert!(err
            .to_string()
            .contains("tenant entities missing, create them first: Acme, Globex"));
        assert!(map.tenant_for_source_id(&"environments-1".into()).is_err());
    }

    #[test]
    fn grouping_associates_all_matching_sources_with_one_tenant() {
        let tenants = vec![
            Tenant::new("tenants-1", "Acme"),
            Tenant::new("tenants-2", "Globex"),
        ];
        let map = TenantMap::build(&sources(), &tenants);
        let groups = map.complete().unwrap();

        assert_eq!(groups.len(), 2);
        let acme = groups.group_for_tenant_id(&"tenants-1".into()).unwrap();
        let names: Vec<&str> = acme
            .source_environments
            .iter()
            .map(|env| env.name.as_str())
            .collect();
        assert_eq!(names, ["Acme - Staging", "Acme - Production"]);

        // Both Acme sources resolve to the same tenant entity
        let staging_tenant = groups
            .tenant_for_source_id(&"environments-1".into())
            .unwrap();
        let production_tenant = groups
            .tenant_for_source_id(&"environments-2".into())
            .unwrap();
        assert_eq!(staging_tenant.id, production_tenant.id);
    }

    #[test]
    fn tenant_matching_is_case_insensitive() {
        let tenants = vec![
            Tenant::new("tenants-1", "ACME"),
            Tenant::new("tenants-2", "globex"),
        ];
        let map = TenantMap::build(&sources(), &tenants);
        assert!(map.is_complete());
        assert_eq!(
            map.tenant_for_source_id(&"environments-3".into())
                .unwrap()
                .unwrap()
                .id
                .as_str(),
            "tenants-2"
        );
    }

    #[test]
    fn bulk_tenant_lookup_dedups_and_skips_unknown_ids() {
        let tenants = vec![
            Tenant::new("tenants-1", "Acme"),
            Tenant::new("tenants-2", "Globex"),
        ];
        let map = TenantMap::build(&sources(), &tenants);
        let groups = map.complete().unwrap();

        let ids = [
            EnvironmentId::from("environments-1"),
            EnvironmentId::from("environments-2"),
            EnvironmentId::from("environments-404"),
        ];
        let resolved = groups.tenants_for_source_ids(&ids);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name, "Acme");
    }

    #[test]
    fn building_twice_yields_identical_groupings() {
        let tenants = vec![
            Tenant::new("tenants-1", "Acme"),
            Tenant::new("tenants-2", "Globex"),
        ];
        let collect = |map: &TenantMap| -> Vec<(String, Vec<String>)> {
            map.complete()
                .unwrap()
                .iter()
                .map(|group| {
                    (
                        group.tenant.id.to_string(),
                        group.source_ids().map(ToString::to_string).collect(),
                    )
                })
                .collect()
        };
        let first = TenantMap::build(&sources(), &tenants);
        let second = TenantMap::build(&sources(), &tenants);
        assert_eq!(collect(&first), collect(&second));
    }
}
