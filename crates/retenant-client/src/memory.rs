//! In-memory repository
//!
//! A complete in-process implementation of [`Repository`] with the same
//! upsert-by-name semantics the remote platform offers. Used by tests and
//! fixtures; also handy for rehearsing a migration against a copied
//! snapshot.

use crate::repository::{same_name, ClientError, Repository};
use async_trait::async_trait;
use parking_lot::Mutex;
use retenant_model::{
    Channel, Environment, EnvironmentId, LibraryVariableSet, Lifecycle, LifecycleId, Machine,
    Phase, Project, ProjectId, TagSet, Tenant,
};

#[derive(Debug, Default)]
struct State {
    environments: Vec<Environment>,
    tenants: Vec<Tenant>,
    projects: Vec<Project>,
    lifecycles: Vec<Lifecycle>,
    channels: Vec<Channel>,
    machines: Vec<Machine>,
    tag_sets: Vec<TagSet>,
    library_variable_sets: Vec<LibraryVariableSet>,
    next_id: u64,
}

impl State {
    fn assign_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

/// In-process [`Repository`] implementation
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: Mutex<State>,
}

impl InMemoryRepository {
    /// Create an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an environment, returning the stored snapshot
    pub fn seed_environment(&self, name: &str) -> Environment {
        let mut state = self.state.lock();
        let id = state.assign_id("environments");
        let environment = Environment::new(id, name);
        state.environments.push(environment.clone());
        environment
    }

    /// Seed a tenant
    pub fn seed_tenant(&self, name: &str) -> Tenant {
        let mut state = self.state.lock();
        let id = state.assign_id("tenants");
        let tenant = Tenant::new(id, name);
        state.tenants.push(tenant.clone());
        tenant
    }

    /// Seed a lifecycle with the given phases
    pub fn seed_lifecycle(&self, name: &str, phases: Vec<Phase>) -> Lifecycle {
        let mut state = self.state.lock();
        let id = state.assign_id("lifecycles");
        let mut lifecycle = Lifecycle::new(id, name);
        lifecycle.phases = phases;
        state.lifecycles.push(lifecycle.clone());
        lifecycle
    }

    /// Seed a project on its default lifecycle
    pub fn seed_project(&self, name: &str, lifecycle: &LifecycleId) -> Project {
        let mut state = self.state.lock();
        let id = state.assign_id("projects");
        let project = Project::new(id, name, lifecycle.clone());
        state.projects.push(project.clone());
        project
    }

    /// Seed a channel, optionally overriding the project lifecycle
    pub fn seed_channel(
        &self,
        name: &str,
        project: &ProjectId,
        lifecycle: Option<LifecycleId>,
    ) -> Channel {
        let mut state = self.state.lock();
        let id = state.assign_id("channels");
        let mut channel = Channel::new(id, name, project.clone());
        channel.lifecycle_id = lifecycle;
        state.channels.push(channel.clone());
        channel
    }

    /// Seed a machine registered in the given environments
    pub fn seed_machine<I>(&self, name: &str, environments: I) -> Machine
    where
        I: IntoIterator<Item = EnvironmentId>,
    {
        let mut state = self.state.lock();
        let id = state.assign_id("machines");
        let mut machine = Machine::new(id, name);
        machine.environment_ids.extend(environments);
        state.machines.push(machine.clone());
        machine
    }
}

fn replace_by_id<T, F>(collection: &mut [T], kind: &'static str, id: String, matches: F, entity: T) -> Result<(), ClientError>
where
    F: Fn(&T) -> bool,
{
    match collection.iter_mut().find(|existing| matches(existing)) {
        Some(slot) => {
            *slot = entity;
            Ok(())
        }
        None => Err(ClientError::UnknownId { kind, id }),
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn environments(&self) -> Result<Vec<Environment>, ClientError> {
        Ok(self.state.lock().environments.clone())
    }

    async fn tenants(&self) -> Result<Vec<Tenant>, ClientError> {
        Ok(self.state.lock().tenants.clone())
    }

    async fn projects(&self) -> Result<Vec<Project>, ClientError> {
        Ok(self.state.lock().projects.clone())
    }

    async fn lifecycles(&self) -> Result<Vec<Lifecycle>, ClientError> {
        Ok(self.state.lock().lifecycles.clone())
    }

    async fn channels(&self) -> Result<Vec<Channel>, ClientError> {
        Ok(self.state.lock().channels.clone())
    }

    async fn machines(&self) -> Result<Vec<Machine>, ClientError> {
        Ok(self.state.lock().machines.clone())
    }

    async fn tag_sets(&self) -> Result<Vec<TagSet>, ClientError> {
        Ok(self.state.lock().tag_sets.clone())
    }

    async fn library_variable_sets(&self) -> Result<Vec<LibraryVariableSet>, ClientError> {
        Ok(self.state.lock().library_variable_sets.clone())
    }

    async fn create_or_modify_environment(&self, name: &str) -> Result<Environment, ClientError> {
        let mut state = self.state.lock();
        if let Some(existing) = state
            .environments
            .iter()
            .find(|env| same_name(&env.name, name))
        {
            return Ok(existing.clone());
        }
        let id = state.assign_id("environments");
        let environment = Environment::new(id, name);
        state.environments.push(environment.clone());
        Ok(environment)
    }

    async fn create_or_modify_tenant(&self, name: &str) -> Result<Tenant, ClientError> {
        let mut state = self.state.lock();
        if let Some(existing) = state
            .tenants
            .iter()
            .find(|tenant| same_name(&tenant.name, name))
        {
            return Ok(existing.clone());
        }
        let id = state.assign_id("tenants");
        let tenant = Tenant::new(id, name);
        state.tenants.push(tenant.clone());
        Ok(tenant)
    }

    async fn create_or_modify_tag_set(&self, name: &str) -> Result<TagSet, ClientError> {
        let mut state = self.state.lock();
        if let Some(existing) = state.tag_sets.iter().find(|set| same_name(&set.name, name)) {
            return Ok(existing.clone());
        }
        let id = state.assign_id("tagsets");
        let set = TagSet {
            id: id.into(),
            name: name.to_string(),
            tags: Vec::new(),
        };
        state.tag_sets.push(set.clone());
        Ok(set)
    }

    async fn create_or_modify_library_variable_set(
        &self,
        name: &str,
    ) -> Result<LibraryVariableSet, ClientError> {
        let mut state = self.state.lock();
        if let Some(existing) = state
            .library_variable_sets
            .iter()
            .find(|set| same_name(&set.name, name))
        {
            return Ok(existing.clone());
        }
        let id = state.assign_id("libraryvariablesets");
        let set = LibraryVariableSet {
            id: id.into(),
            name: name.to_string(),
            templates: Vec::new(),
        };
        state.library_variable_sets.push(set.clone());
        Ok(set)
    }

    async fn modify_lifecycle(&self, lifecycle: &Lifecycle) -> Result<(), ClientError> {
        let mut state = self.state.lock();
        let id = lifecycle.id.clone();
        replace_by_id(
            &mut state.lifecycles,
            "lifecycle",
            id.to_string(),
            |existing| existing.id == id,
            lifecycle.clone(),
        )
    }

    async fn modify_project(&self, project: &Project) -> Result<(), ClientError> {
        let mut state = self.state.lock();
        let id = project.id.clone();
        replace_by_id(
            &mut state.projects,
            "project",
            id.to_string(),
            |existing| existing.id == id,
            project.clone(),
        )
    }

    async fn modify_tenant(&self, tenant: &Tenant) -> Result<(), ClientError> {
        let mut state = self.state.lock();
        // The real platform refuses tenant links to projects that only take
        // untenanted deployments; mirror that so sequencing bugs surface.
        for (project_id, environments) in &tenant.project_environments {
            if environments.is_empty() {
                continue;
            }
            let accepts_tenants = state
                .projects
                .iter()
                .find(|project| project.id == *project_id)
                .is_some_and(|project| project.tenanted_deployment_mode.allows_tenants());
            if !accepts_tenants {
                return Err(ClientError::Validation(format!(
                    "tenant {} cannot be linked to project {project_id}: \
                     project does not accept tenanted deployments",
                    tenant.name
                )));
            }
        }
        let id = tenant.id.clone();
        replace_by_id(
            &mut state.tenants,
            "tenant",
            id.to_string(),
            |existing| existing.id == id,
            tenant.clone(),
        )
    }

    async fn modify_machine(&self, machine: &Machine) -> Result<(), ClientError> {
        let mut state = self.state.lock();
        let id = machine.id.clone();
        replace_by_id(
            &mut state.machines,
            "machine",
            id.to_string(),
            |existing| existing.id == id,
            machine.clone(),
        )
    }

    async fn modify_tag_set(&self, tag_set: &TagSet) -> Result<(), ClientError> {
        let mut state = self.state.lock();
        let id = tag_set.id.clone();
        replace_by_id(
            &mut state.tag_sets,
            "tag set",
            id.to_string(),
            |existing| existing.id == id,
            tag_set.clone(),
        )
    }

    async fn modify_library_variable_set(
        &self,
        set: &LibraryVariableSet,
    ) -> Result<(), ClientError> {
        let mut state = self.state.lock();
        let id = set.id.clone();
        replace_by_id(
            &mut state.library_variable_sets,
            "library variable set",
            id.to_string(),
            |existing| existing.id == id,
            set.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_by_name_is_idempotent() {
        let repo = InMemoryRepository::new();
        let first = repo.create_or_modify_environment("Staging").await.unwrap();
        let second = repo.create_or_modify_environment("staging").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(repo.environments().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn modify_replaces_stored_entity() {
        let repo = InMemoryRepository::new();
        let env = repo.seed_environment("Acme - Staging");
        let lifecycle = repo.seed_lifecycle("Default", vec![Phase::new("All")]);

        let mut updated = lifecycle.clone();
        updated.phases[0].add_automatic_target(env.id.clone());
        repo.modify_lifecycle(&updated).await.unwrap();

        let stored = repo.lifecycles().await.unwrap();
        assert_eq!(stored[0].phases[0].automatic_deployment_targets.len(), 1);
    }

    #[tokio::test]
    async fn modify_unknown_id_is_rejected() {
        let repo = InMemoryRepository::new();
        let ghost = Lifecycle::new("lifecycles-404", "Ghost");
        let err = repo.modify_lifecycle(&ghost).await.unwrap_err();
        assert!(matches!(err, ClientError::UnknownId { kind: "lifecycle", .. }));
    }

    #[tokio::test]
    async fn tenant_link_to_untenanted_project_is_rejected() {
        let repo = InMemoryRepository::new();
        let env = repo.seed_environment("Staging");
        let lifecycle = repo.seed_lifecycle("Default", vec![]);
        let project = repo.seed_project("Web", &lifecycle.id);

        let mut tenant = repo.seed_tenant("Acme");
        tenant.connect_to_project(&project.id, [env.id.clone()]);
        let err = repo.modify_tenant(&tenant).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));

        // Widening the project first makes the same save pass.
        let mut widened = project.clone();
        widened.widen_tenancy();
        repo.modify_project(&widened).await.unwrap();
        repo.modify_tenant(&tenant).await.unwrap();
    }

    #[tokio::test]
    async fn snapshots_are_copies() {
        let repo = InMemoryRepository::new();
        repo.seed_environment("Acme");
        let mut snapshot = repo.environments().await.unwrap();
        snapshot[0].name = "mutated".to_string();
        assert_eq!(repo.environments().await.unwrap()[0].name, "Acme");
    }

    #[test]
    fn seeded_ids_are_unique_across_kinds() {
        let repo = InMemoryRepository::new();
        let env = repo.seed_environment("A");
        let tenant = repo.seed_tenant("B");
        assert_ne!(env.id.as_str(), tenant.id.as_str());
    }
}
