//! The end-to-end migration run
//!
//! Each step is a full-snapshot read, a pure computation, and an explicit
//! write-back. Maps are rebuilt from enlarged snapshots after missing
//! entities are created; they are never mutated in place. The whole run is
//! additive, so the recovery strategy for any mid-run failure is to fix the
//! cause and run the command again.

use crate::connect::{apply_connections, plan_connections};
use crate::conventions::ensure_conventions;
use crate::error::MigrationError;
use crate::filter::SourceFilter;
use crate::machines::repoint_machines;
use crate::propagate::propagate_lifecycles;
use retenant_client::Repository;
use retenant_map::{naming, EnvironmentMap, TenantMap};
use retenant_model::Environment;
use std::fmt;

/// Knobs for one migration run
#[derive(Debug, Clone, Default)]
pub struct MigrationOptions {
    /// Only environments whose name matches count as sources
    pub include: Option<String>,
    /// Environments whose name matches are never sources
    pub exclude: Option<String>,
    /// Leave deployment targets (machines) untouched
    pub skip_machines: bool,
    /// Leave tags and tenant variables untouched
    pub skip_setup: bool,
}

/// What one migration run created and updated
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Environments that passed the source filter
    pub source_environments: usize,
    /// Target environments created this run, in creation order
    pub created_environments: Vec<String>,
    /// Tenants created this run, in creation order
    pub created_tenants: Vec<String>,
    /// Lifecycles whose phases gained target references
    pub lifecycles_updated: usize,
    /// Projects widened to accept tenanted deployments
    pub projects_widened: usize,
    /// Tenants that gained project connections
    pub tenants_connected: usize,
    /// Machines re-pointed at target environments
    pub machines_updated: usize,
    /// Tenants that received convention defaults
    pub tenants_configured: usize,
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "source environments:   {}", self.source_environments)?;
        writeln!(
            f,
            "environments created:  {}",
            joined_or_none(&self.created_environments)
        )?;
        writeln!(
            f,
            "tenants created:       {}",
            joined_or_none(&self.created_tenants)
        )?;
        writeln!(f, "lifecycles updated:    {}", self.lifecycles_updated)?;
        writeln!(f, "projects widened:      {}", self.projects_widened)?;
        writeln!(f, "tenants connected:     {}", self.tenants_connected)?;
        writeln!(f, "machines updated:      {}", self.machines_updated)?;
        write!(f, "tenants configured:    {}", self.tenants_configured)
    }
}

fn joined_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

/// One reconciliation pass over a remote repository
pub struct Migration<'a> {
    repository: &'a dyn Repository,
    options: MigrationOptions,
}

impl<'a> Migration<'a> {
    /// Prepare a run against the given repository
    #[must_use]
    pub fn new(repository: &'a dyn Repository, options: MigrationOptions) -> Self {
        Self {
            repository,
            options,
        }
    }

    /// Execute the whole reconciliation
    pub async fn run(&self) -> Result<MigrationReport, MigrationError> {
        let filter = SourceFilter::new(
            self.options.include.as_deref(),
            self.options.exclude.as_deref(),
        )?;
        let mut report = MigrationReport::default();

        let environments = self.repository.environments().await?;
        let sources: Vec<Environment> = environments
            .iter()
            .filter(|env| filter.matches(&env.name))
            .cloned()
            .collect();
        report.source_environments = sources.len();
        if sources.is_empty() {
            tracing::warn!("no environments match the source filter; nothing to reconcile");
            return Ok(report);
        }
        for source in &sources {
            if naming::tenant_name_of(&source.name).is_empty() {
                tracing::warn!(
                    environment = %source.name,
                    "source name derives an empty tenant name"
                );
            }
        }

        tracing::info!(sources = sources.len(), "deriving target environments");
        let environment_map = self
            .ensure_target_environments(&sources, &environments, &mut report)
            .await?;
        let pairs = environment_map.complete()?;

        tracing::info!("deriving tenants");
        let tenant_map = self.ensure_tenants(&sources, &mut report).await?;
        let groups = tenant_map.complete()?;

        tracing::info!("propagating lifecycle phase targets");
        report.lifecycles_updated = propagate_lifecycles(self.repository, pairs).await?;

        tracing::info!("connecting tenants to projects");
        let projects = self.repository.projects().await?;
        let channels = self.repository.channels().await?;
        let lifecycles = self.repository.lifecycles().await?;
        let plan = plan_connections(&projects, &channels, &lifecycles, groups, pairs);
        report.projects_widened = plan.projects.len();
        report.tenants_connected = plan.tenants.len();
        apply_connections(self.repository, &plan).await?;

        if self.options.skip_machines {
            tracing::info!("skipping deployment target re-pointing");
        } else {
            tracing::info!("re-pointing deployment targets");
            report.machines_updated = repoint_machines(self.repository, pairs, groups).await?;
        }

        if self.options.skip_setup {
            tracing::info!("skipping convention value setup");
        } else {
            tracing::info!("applying convention defaults to tenants");
            report.tenants_configured = ensure_conventions(self.repository, groups).await?;
        }

        Ok(report)
    }

    /// Create the target environments the convention implies, then rebuild
    /// the map from a fresh snapshot
    async fn ensure_target_environments(
        &self,
        sources: &[Environment],
        existing: &[Environment],
        report: &mut MigrationReport,
    ) -> Result<EnvironmentMap, MigrationError> {
        let map = EnvironmentMap::build(sources, existing);
        if map.is_complete() {
            return Ok(map);
        }
        for name in map.missing_target_names() {
            tracing::info!(name = %name, "creating target environment");
            self.repository.create_or_modify_environment(name).await?;
            report.created_environments.push(name.clone());
        }
        let refreshed = self.repository.environments().await?;
        Ok(EnvironmentMap::build(sources, &refreshed))
    }

    /// Create the tenants the convention implies, then rebuild the map from
    /// a fresh snapshot
    async fn ensure_tenants(
        &self,
        sources: &[Environment],
        report: &mut MigrationReport,
    ) -> Result<TenantMap, MigrationError> {
        let tenants = self.repository.tenants().await?;
        let map = TenantMap::build(sources, &tenants);
        if map.is_complete() {
            return Ok(map);
        }
        for name in map.missing_tenant_names() {
            tracing::info!(name = %name, "creating tenant");
            self.repository.create_or_modify_tenant(name).await?;
            report.created_tenants.push(name.clone());
        }
        let refreshed = self.repository.tenants().await?;
        Ok(TenantMap::build(sources, &refreshed))
    }
}
