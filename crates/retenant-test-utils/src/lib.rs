//! Testing utilities for the retenant workspace
//!
//! Shared fixtures built on the in-memory repository.

#![allow(missing_docs)]

use retenant_client::InMemoryRepository;
use retenant_model::{Environment, Lifecycle, Machine, Phase, Project};

/// The canonical two-tenant scenario, seeded into an in-memory repository
///
/// Three pseudo-tenant environments (`"Acme - Staging"`, `"Acme - Production"`,
/// `"Globex"`), one deployment lifecycle referencing them, a project on that
/// lifecycle, an unrelated project on an empty lifecycle, and one machine
/// registered in the staging source environment.
#[derive(Debug)]
pub struct AcmeScenario {
    pub repository: InMemoryRepository,
    pub staging_source: Environment,
    pub production_source: Environment,
    pub globex_source: Environment,
    pub lifecycle: Lifecycle,
    pub web_project: Project,
    pub internal_project: Project,
    pub machine: Machine,
}

pub fn setup_acme_scenario() -> AcmeScenario {
    let repository = InMemoryRepository::new();

    let staging_source = repository.seed_environment("Acme - Staging");
    let production_source = repository.seed_environment("Acme - Production");
    let globex_source = repository.seed_environment("Globex");

    let mut staging_phase = Phase::new("Staging");
    staging_phase.add_automatic_target(staging_source.id.clone());
    let mut production_phase = Phase::new("Production");
    production_phase.add_automatic_target(production_source.id.clone());
    production_phase.add_optional_target(globex_source.id.clone());
    let lifecycle = repository.seed_lifecycle(
        "Default Lifecycle",
        vec![staging_phase, production_phase],
    );

    let web_project = repository.seed_project("Web Portal", &lifecycle.id);

    // A project whose lifecycle never references a source environment; the
    // migration must leave it alone.
    let empty_lifecycle = repository.seed_lifecycle("Internal", vec![Phase::new("Ops")]);
    let internal_project = repository.seed_project("Internal Tools", &empty_lifecycle.id);

    let machine = repository.seed_machine("web-01", [staging_source.id.clone()]);

    AcmeScenario {
        repository,
        staging_source,
        production_source,
        globex_source,
        lifecycle,
        web_project,
        internal_project,
        machine,
    }
}

/// Find an environment by display name, panicking when absent
pub fn environment_named(environments: &[Environment], name: &str) -> Environment {
    environments
        .iter()
        .find(|env| env.name == name)
        .unwrap_or_else(|| panic!("no environment named {name}"))
        .clone()
}
