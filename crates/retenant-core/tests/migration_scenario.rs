//! End-to-end migration runs against the in-memory repository

use pretty_assertions::assert_eq;
use retenant_client::{InMemoryRepository, Repository};
use retenant_core::{Migration, MigrationOptions};
use retenant_model::{
    Channel, Environment, LibraryVariableSet, Lifecycle, Machine, Project, TagSet, Tenant,
    TenantedDeploymentMode,
};
use retenant_test_utils::{environment_named, setup_acme_scenario};

fn tenant_named(tenants: &[Tenant], name: &str) -> Tenant {
    tenants
        .iter()
        .find(|tenant| tenant.name == name)
        .unwrap_or_else(|| panic!("no tenant named {name}"))
        .clone()
}

type Snapshot = (
    Vec<Environment>,
    Vec<Tenant>,
    Vec<Project>,
    Vec<Lifecycle>,
    Vec<Channel>,
    Vec<Machine>,
    Vec<TagSet>,
    Vec<LibraryVariableSet>,
);

async fn snapshot(repository: &InMemoryRepository) -> Snapshot {
    (
        repository.environments().await.unwrap(),
        repository.tenants().await.unwrap(),
        repository.projects().await.unwrap(),
        repository.lifecycles().await.unwrap(),
        repository.channels().await.unwrap(),
        repository.machines().await.unwrap(),
        repository.tag_sets().await.unwrap(),
        repository.library_variable_sets().await.unwrap(),
    )
}

#[tokio::test]
async fn full_migration_creates_and_wires_everything() {
    let scenario = setup_acme_scenario();
    let repository = &scenario.repository;

    let report = Migration::new(repository, MigrationOptions::default())
        .run()
        .await
        .unwrap();

    assert_eq!(report.source_environments, 3);
    assert_eq!(report.created_environments, ["Production", "Staging"]);
    assert_eq!(report.created_tenants, ["Acme", "Globex"]);
    assert_eq!(report.lifecycles_updated, 1);
    assert_eq!(report.projects_widened, 1);
    assert_eq!(report.tenants_connected, 2);
    assert_eq!(report.machines_updated, 1);
    assert_eq!(report.tenants_configured, 2);

    let environments = repository.environments().await.unwrap();
    assert_eq!(environments.len(), 5);
    let staging_target = environment_named(&environments, "Staging");
    let production_target = environment_named(&environments, "Production");

    // Phase targets gained the mapped environments, sources kept in place.
    let lifecycles = repository.lifecycles().await.unwrap();
    let lifecycle = lifecycles
        .iter()
        .find(|lifecycle| lifecycle.name == "Default Lifecycle")
        .unwrap();
    let staging_phase = &lifecycle.phases[0];
    assert_eq!(
        staging_phase.automatic_deployment_targets,
        [
            scenario.staging_source.id.clone(),
            staging_target.id.clone()
        ]
    );
    let production_phase = &lifecycle.phases[1];
    assert_eq!(
        production_phase.automatic_deployment_targets,
        [
            scenario.production_source.id.clone(),
            production_target.id.clone()
        ]
    );
    assert_eq!(
        production_phase.optional_deployment_targets,
        [
            scenario.globex_source.id.clone(),
            production_target.id.clone()
        ]
    );

    // The project with matching lifecycles was widened; the other was not.
    let projects = repository.projects().await.unwrap();
    let web = projects
        .iter()
        .find(|project| project.id == scenario.web_project.id)
        .unwrap();
    assert_eq!(
        web.tenanted_deployment_mode,
        TenantedDeploymentMode::TenantedOrUntenanted
    );
    let internal = projects
        .iter()
        .find(|project| project.id == scenario.internal_project.id)
        .unwrap();
    assert_eq!(
        internal.tenanted_deployment_mode,
        TenantedDeploymentMode::Untenanted
    );

    // Tenants are connected to exactly the environments that matched.
    let tenants = repository.tenants().await.unwrap();
    let acme = tenant_named(&tenants, "Acme");
    let acme_connected = &acme.project_environments[&scenario.web_project.id];
    assert_eq!(acme_connected.len(), 2);
    assert!(acme_connected.contains(&staging_target.id));
    assert!(acme_connected.contains(&production_target.id));

    let globex = tenant_named(&tenants, "Globex");
    let globex_connected = &globex.project_environments[&scenario.web_project.id];
    assert_eq!(globex_connected.len(), 1);
    assert!(globex_connected.contains(&production_target.id));
    assert!(!globex.project_environments.contains_key(&scenario.internal_project.id));

    // The machine follows its source environment's tenant and target.
    let machines = repository.machines().await.unwrap();
    let machine = &machines[0];
    assert!(machine.environment_ids.contains(&scenario.staging_source.id));
    assert!(machine.environment_ids.contains(&staging_target.id));
    assert!(machine.tenant_ids.contains(&acme.id));
    assert!(!machine.tenant_ids.contains(&globex.id));

    // Convention defaults: region tag, alias, region, password.
    assert!(acme.tenant_tags.contains("Regions/eu-west"));
    assert_eq!(acme.variables["Tenant.Alias"], "acme");
    assert_eq!(acme.variables["Tenant.Region"], "eu-west");
    assert_eq!(acme.variables["Tenant.Password"].len(), 20);
    assert_eq!(globex.variables["Tenant.Alias"], "globex");

    let tag_sets = repository.tag_sets().await.unwrap();
    assert_eq!(tag_sets[0].name, "Regions");
    assert_eq!(tag_sets[0].tags.len(), 5);
    let variable_sets = repository.library_variable_sets().await.unwrap();
    assert_eq!(variable_sets[0].name, "Tenant Defaults");
    assert_eq!(variable_sets[0].templates.len(), 3);
}

#[tokio::test]
async fn scoped_second_run_changes_nothing() {
    let scenario = setup_acme_scenario();
    let repository = &scenario.repository;
    // Scope to the original sources so the created target environments do
    // not themselves become sources on the re-run.
    let options = MigrationOptions {
        include: Some("Acme|Globex".to_string()),
        ..MigrationOptions::default()
    };

    Migration::new(repository, options.clone())
        .run()
        .await
        .unwrap();
    let after_first = snapshot(repository).await;

    let report = Migration::new(repository, options).run().await.unwrap();
    assert_eq!(report.source_environments, 3);
    assert!(report.created_environments.is_empty());
    assert!(report.created_tenants.is_empty());
    assert_eq!(report.lifecycles_updated, 0);
    assert_eq!(report.projects_widened, 0);
    assert_eq!(report.tenants_connected, 0);
    assert_eq!(report.machines_updated, 0);
    assert_eq!(report.tenants_configured, 0);

    // Byte-for-byte stable, generated passwords included.
    assert_eq!(snapshot(repository).await, after_first);
}

#[tokio::test]
async fn exclude_filter_limits_the_source_set() {
    let scenario = setup_acme_scenario();
    let repository = &scenario.repository;

    let options = MigrationOptions {
        exclude: Some("globex".to_string()),
        ..MigrationOptions::default()
    };
    let report = Migration::new(repository, options).run().await.unwrap();

    assert_eq!(report.source_environments, 2);
    assert_eq!(report.created_tenants, ["Acme"]);

    let tenants = repository.tenants().await.unwrap();
    assert!(tenants.iter().all(|tenant| tenant.name != "Globex"));

    // The excluded source passes through phase lists untouched.
    let lifecycles = repository.lifecycles().await.unwrap();
    let lifecycle = lifecycles
        .iter()
        .find(|lifecycle| lifecycle.name == "Default Lifecycle")
        .unwrap();
    assert_eq!(
        lifecycle.phases[1].optional_deployment_targets,
        [scenario.globex_source.id.clone()]
    );
}

#[tokio::test]
async fn pre_existing_connections_are_never_erased() {
    let scenario = setup_acme_scenario();
    let repository = &scenario.repository;

    // An operator connected the Acme tenant to an unrelated project before
    // the migration ever ran.
    let legacy_lifecycle = repository.seed_lifecycle("Legacy", vec![]);
    let mut legacy_project = repository.seed_project("Legacy App", &legacy_lifecycle.id);
    legacy_project.widen_tenancy();
    repository.modify_project(&legacy_project).await.unwrap();

    let mut acme = repository.seed_tenant("Acme");
    acme.connect_to_project(&legacy_project.id, [scenario.staging_source.id.clone()]);
    repository.modify_tenant(&acme).await.unwrap();

    let report = Migration::new(repository, MigrationOptions::default())
        .run()
        .await
        .unwrap();
    // "Acme" already existed, only "Globex" was created.
    assert_eq!(report.created_tenants, ["Globex"]);

    let tenants = repository.tenants().await.unwrap();
    let acme = tenant_named(&tenants, "Acme");
    assert!(acme.project_environments[&legacy_project.id]
        .contains(&scenario.staging_source.id));
    assert!(acme.project_environments.contains_key(&scenario.web_project.id));
}

#[tokio::test]
async fn skip_flags_leave_machines_and_setup_alone() {
    let scenario = setup_acme_scenario();
    let repository = &scenario.repository;

    let options = MigrationOptions {
        skip_machines: true,
        skip_setup: true,
        ..MigrationOptions::default()
    };
    let report = Migration::new(repository, options).run().await.unwrap();

    assert_eq!(report.machines_updated, 0);
    assert_eq!(report.tenants_configured, 0);

    let machines = repository.machines().await.unwrap();
    assert_eq!(machines[0], scenario.machine);
    assert!(repository.tag_sets().await.unwrap().is_empty());
    assert!(repository
        .library_variable_sets()
        .await
        .unwrap()
        .is_empty());

    let tenants = repository.tenants().await.unwrap();
    assert!(tenant_named(&tenants, "Acme").variables.is_empty());
}

#[tokio::test]
async fn empty_source_set_reports_and_stops() {
    let repository = InMemoryRepository::new();
    let report = Migration::new(&repository, MigrationOptions::default())
        .run()
        .await
        .unwrap();

    assert_eq!(report, retenant_core::MigrationReport::default());
    assert!(repository.environments().await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_filter_fails_before_any_write() {
    let scenario = setup_acme_scenario();
    let repository = &scenario.repository;
    let before = snapshot(repository).await;

    let options = MigrationOptions {
        include: Some("[".to_string()),
        ..MigrationOptions::default()
    };
    let err = Migration::new(repository, options).run().await.unwrap_err();
    assert!(err.to_string().starts_with("invalid --include pattern"));

    assert_eq!(snapshot(repository).await, before);
}
