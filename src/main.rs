use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use export_registry::{
    DuplicatePolicy, Kind, Loader, Registry,
    config::Config,
    lint,
    storage::{debug::DebugClient, local::LocalDatabase},
};
use tracing::{error, info, warn};

#[derive(Parser)]
struct Opts {
    #[clap(short, long, env = "EXPORT_REGISTRY_CONFIG")]
    config: Option<PathBuf>,
    /// sqlx SQLite URL, overrides the config file
    #[clap(short, long, env = "EXPORT_REGISTRY_DATABASE")]
    database: Option<String>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the lookup tables and upsert fixtures into them
    Load {
        fixtures: Vec<PathBuf>,
        /// Log the statements instead of running them
        #[clap(long)]
        dry_run: bool,
        /// Fail when a pk appears twice for the same kind
        #[clap(long)]
        reject_duplicates: bool,
    },
    /// Validate fixtures without touching the database
    Check { fixtures: Vec<PathBuf> },
    /// Print the loaded registry
    List,
    /// Print the loaded tables as fixture JSON
    Dump,
}

async fn read_config(opts: &Opts) -> anyhow::Result<Config> {
    let mut config = match &opts.config {
        Some(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| "read config")?;
            Config::from_yaml(&text)
                .with_context(|| format!("parse config from {}", path.display()))?
                .relative_to(path.parent().unwrap_or(Path::new(".")))
        }
        None => Config::default(),
    };
    if let Some(database) = &opts.database {
        config.database = Some(database.clone());
    }
    config.validate().map_err(|msg| anyhow!("{msg}"))?;
    Ok(config)
}

async fn open_registry(config: &Config) -> anyhow::Result<Registry> {
    let db = LocalDatabase::open(config.database())
        .await
        .with_context(|| format!("open {}", config.database()))?;
    Ok(Registry::new(db.pool().clone()))
}

async fn run(opts: Opts) -> anyhow::Result<()> {
    let mut config = read_config(&opts).await?;
    match opts.command {
        Command::Load {
            fixtures,
            dry_run,
            reject_duplicates,
        } => {
            if !fixtures.is_empty() {
                config.fixtures = fixtures;
            }
            if reject_duplicates {
                config.on_duplicate = DuplicatePolicy::Reject;
            }
            let fixtures = config.read_fixtures().await?;
            let summary = if dry_run {
                Loader::new(DebugClient::default())
                    .with_policy(config.on_duplicate)
                    .load(&fixtures)
                    .await?
            } else {
                let db = LocalDatabase::open(config.database())
                    .await
                    .with_context(|| format!("open {}", config.database()))?;
                Loader::new(db.client())
                    .with_policy(config.on_duplicate)
                    .load(&fixtures)
                    .await?
            };
            info!(affected = summary.affected, dry_run, "load finished");
        }
        Command::Check { fixtures } => {
            if !fixtures.is_empty() {
                config.fixtures = fixtures;
            }
            let fixtures = config.read_fixtures().await?;
            for lint in lint::lint(&fixtures) {
                warn!(%lint, "lint");
            }
            for fixture in &fixtures {
                println!("{}", fixture.source.display());
                for kind in Kind::ALL {
                    println!("  {kind}: {}", fixture.count(kind));
                }
            }
        }
        Command::List => {
            let registry = open_registry(&config).await?;
            println!("export types:");
            for row in registry.export_types().await? {
                println!("  {:>3} {:<32} {}", row.order, row.pk, row.label);
            }
            println!("export filters:");
            for row in registry.export_filters().await? {
                println!("  {:>3} {:<32} {}", row.order, row.pk, row.label);
            }
            println!("statuses:");
            for row in registry.statuses().await? {
                println!("      {:<32} {}", row.pk, row.label);
            }
        }
        Command::Dump => {
            let registry = open_registry(&config).await?;
            let fixture = registry.dump().await?;
            println!("{}", serde_json::to_string_pretty(&fixture.to_value())?);
        }
    }
    Ok(())
}

fn main() {
    let opts = Opts::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(?e, "failed to start runtime");
            std::process::exit(1);
        }
    };
    if let Err(e) = runtime.block_on(run(opts)) {
        error!(?e, "critical error");
        std::process::exit(1);
    }
}
