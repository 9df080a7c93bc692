//! Source-to-target environment map
//!
//! Pairs every source (pseudo-tenant) environment with the real target
//! environment its name implies. The map is a sum type: lookups only exist
//! once every derived target name has a matching environment, so a caller
//! cannot resolve through a map that still has gaps.

use crate::error::{EntityKind, MapError};
use crate::naming::{name_key, target_environment_name_of};
use indexmap::IndexMap;
use retenant_model::{Environment, EnvironmentId};

/// One source environment paired with its derived target environment
#[derive(Debug, Clone)]
pub struct SourceTargetPair {
    /// Legacy environment being migrated
    pub source: Environment,
    /// Real environment deployments should land on
    pub target: Environment,
}

/// Outcome of deriving targets for a set of source environments
///
/// `Incomplete` reports the derived target names with no existing
/// environment; the caller creates those and rebuilds from the enlarged
/// snapshot. Maps are never mutated in place.
#[derive(Debug, Clone)]
pub enum EnvironmentMap {
    /// Some derived target names have no environment yet
    Incomplete {
        /// Missing names, distinct and sorted
        missing_target_names: Vec<String>,
    },
    /// Every derived target name resolved to an environment
    Complete(EnvironmentPairs),
}

impl EnvironmentMap {
    /// Derive the source→target pairing from two snapshots
    ///
    /// Target names are matched case-insensitively; when several existing
    /// environments collide on a folded name the first in snapshot order
    /// wins. Building from identical snapshots yields identical pairings.
    #[must_use]
    pub fn build(source_environments: &[Environment], existing_environments: &[Environment]) -> Self {
        let mut expected: IndexMap<String, String> = IndexMap::new();
        for source in source_environments {
            let derived = target_environment_name_of(&source.name);
            expected.entry(name_key(&derived)).or_insert(derived);
        }
        expected.sort_keys();

        let mut existing_by_key: IndexMap<String, &Environment> = IndexMap::new();
        for environment in existing_environments {
            existing_by_key
                .entry(name_key(&environment.name))
                .or_insert(environment);
        }

        let missing_target_names: Vec<String> = expected
            .iter()
            .filter(|(key, _)| !existing_by_key.contains_key(key.as_str()))
            .map(|(_, name)| name.clone())
            .collect();
        if !missing_target_names.is_empty() {
            return Self::Incomplete {
                missing_target_names,
            };
        }

        let mut pairs = Vec::with_capacity(source_environments.len());
        let mut by_source_id = IndexMap::new();
        let mut by_target_id: IndexMap<EnvironmentId, Vec<usize>> = IndexMap::new();
        let mut targets_by_key = IndexMap::new();
        for source in source_environments {
            let key = name_key(&target_environment_name_of(&source.name));
            let target = existing_by_key[key.as_str()].clone();

            let index = pairs.len();
            by_source_id.insert(source.id.clone(), index);
            by_target_id.entry(target.id.clone()).or_default().push(index);
            targets_by_key.entry(key).or_insert(target.id.clone());
            pairs.push(SourceTargetPair {
                source: source.clone(),
                target,
            });
        }

        Self::Complete(EnvironmentPairs {
            pairs,
            by_source_id,
            by_target_id,
            targets_by_key,
        })
    }

    /// Derived target names that have no environment yet
    #[must_use]
    pub fn missing_target_names(&self) -> &[String] {
        match self {
            Self::Incomplete {
                missing_target_names,
            } => missing_target_names,
            Self::Complete(_) => &[],
        }
    }

    /// Whether every derived target name resolved
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    /// Access the pairing, or fail with the missing-name diagnostic
    pub fn complete(&self) -> Result<&EnvironmentPairs, MapError> {
        match self {
            Self::Complete(pairs) => Ok(pairs),
            Self::Incomplete {
                missing_target_names,
            } => Err(MapError::EntitiesMissing {
                kind: EntityKind::TargetEnvironment,
                missing: missing_target_names.clone(),
            }),
        }
    }

    /// Resolve source ids to their distinct target environments
    pub fn targets_for_source_ids<'a, I>(&self, ids: I) -> Result<Vec<&Environment>, MapError>
    where
        I: IntoIterator<Item = &'a EnvironmentId>,
    {
        Ok(self.complete()?.targets_for_source_ids(ids))
    }

    /// Resolve target ids back to the source environments mapped onto them
    pub fn sources_for_target_ids<'a, I>(&self, ids: I) -> Result<Vec<&Environment>, MapError>
    where
        I: IntoIterator<Item = &'a EnvironmentId>,
    {
        Ok(self.complete()?.sources_for_target_ids(ids))
    }

    /// Look a target environment up by display name, case-insensitively
    pub fn target_named(&self, name: &str) -> Result<Option<&Environment>, MapError> {
        Ok(self.complete()?.target_named(name))
    }
}

/// The complete source→target pairing
///
/// Multiple sources may share one target; a target may have zero sources
/// mapped onto it (it simply never appears here).
#[derive(Debug, Clone)]
pub struct EnvironmentPairs {
    pairs: Vec<SourceTargetPair>,
    by_source_id: IndexMap<EnvironmentId, usize>,
    by_target_id: IndexMap<EnvironmentId, Vec<usize>>,
    targets_by_key: IndexMap<String, EnvironmentId>,
}

impl EnvironmentPairs {
    /// Number of source environments paired
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the pairing is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate pairs in source snapshot order
    pub fn iter(&self) -> impl Iterator<Item = &SourceTargetPair> {
        self.pairs.iter()
    }

    /// Whether the id belongs to a mapped source environment
    #[inline]
    #[must_use]
    pub fn contains_source(&self, id: &EnvironmentId) -> bool {
        self.by_source_id.contains_key(id)
    }

    /// Target environment for one source id
    #[must_use]
    pub fn target_for_source_id(&self, id: &EnvironmentId) -> Option<&Environment> {
        self.by_source_id
            .get(id)
            .map(|&index| &self.pairs[index].target)
    }

    /// Distinct target environments for the given source ids
    ///
    /// Ids that are not mapped source environments are skipped; order follows
    /// the input, first occurrence wins.
    #[must_use]
    pub fn targets_for_source_ids<'a, I>(&self, ids: I) -> Vec<&Environment>
    where
        I: IntoIterator<Item = &'a EnvironmentId>,
    {
        let mut seen = Vec::new();
        let mut targets = Vec::new();
        for id in ids {
            if let Some(target) = self.target_for_source_id(id) {
                if !seen.contains(&&target.id) {
                    seen.push(&target.id);
                    targets.push(target);
                }
            }
        }
        targets
    }

    /// Source environments mapped onto the given target ids
    ///
    /// Ids that are not known targets are skipped.
    #[must_use]
    pub fn sources_for_target_ids<'a, I>(&self, ids: I) -> Vec<&Environment>
    where
        I: IntoIterator<Item = &'a EnvironmentId>,
    {
        let mut sources = Vec::new();
        for id in ids {
            if let Some(indexes) = self.by_target_id.get(id) {
                sources.extend(indexes.iter().map(|&index| &self.pairs[index].source));
            }
        }
        sources
    }

    /// Look a target environment up by display name, case-insensitively
    #[must_use]
    pub fn target_named(&self, name: &str) -> Option<&Environment> {
        let id = self.targets_by_key.get(&name_key(name))?;
        let indexes = self.by_target_id.get(id)?;
        indexes.first().map(|&index| &self.pairs[index].target)
    }
}
