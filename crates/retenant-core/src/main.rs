use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use retenant_client::HttpRepository;
use retenant_core::{Migration, MigrationOptions};
use tracing_subscriber::EnvFilter;

const API_KEY_ENV: &str = "RETENANT_API_KEY";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Command::new("retenant")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reconcile pseudo-tenant environments into native multi-tenancy")
        .subcommand_required(true)
        .subcommand(
            Command::new("migrate")
                .about("Derive tenants and target environments from environment names, create what is missing, and rewire deployments")
                .arg(
                    Arg::new("server")
                        .long("server")
                        .required(true)
                        .help("Base URL of the deployment server, e.g. https://deploy.example.com"),
                )
                .arg(
                    Arg::new("api-key")
                        .long("api-key")
                        .help(format!("API key; falls back to the {API_KEY_ENV} environment variable")),
                )
                .arg(
                    Arg::new("include")
                        .long("include")
                        .help("Case-insensitive regex; only matching environment names count as sources"),
                )
                .arg(
                    Arg::new("exclude")
                        .long("exclude")
                        .help("Case-insensitive regex; matching environment names are never sources (use to scope re-runs past already-migrated environments)"),
                )
                .arg(
                    Arg::new("skip-machines")
                        .long("skip-machines")
                        .action(ArgAction::SetTrue)
                        .help("Leave deployment targets (machines) untouched"),
                )
                .arg(
                    Arg::new("skip-setup")
                        .long("skip-setup")
                        .action(ArgAction::SetTrue)
                        .help("Leave region tags and tenant default variables untouched"),
                ),
        );

    let matches = cli.get_matches();
    let result = match matches.subcommand() {
        Some(("migrate", args)) => migrate(args).await,
        _ => unreachable!("subcommand is required"),
    };

    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn migrate(args: &ArgMatches) -> anyhow::Result<()> {
    let server = args.get_one::<String>("server").unwrap();
    let api_key = args
        .get_one::<String>("api-key")
        .cloned()
        .or_else(|| std::env::var(API_KEY_ENV).ok())
        .context(format!("no API key: pass --api-key or set {API_KEY_ENV}"))?;

    let options = MigrationOptions {
        include: args.get_one::<String>("include").cloned(),
        exclude: args.get_one::<String>("exclude").cloned(),
        skip_machines: args.get_flag("skip-machines"),
        skip_setup: args.get_flag("skip-setup"),
    };

    let repository = HttpRepository::new(server.clone(), api_key);
    let report = Migration::new(&repository, options)
        .run()
        .await
        .context("migration failed")?;

    println!("{report}");
    Ok(())
}
