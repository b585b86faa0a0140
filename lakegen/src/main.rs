use anyhow::Context;
use clap::Parser;
use lakegen::cli::{Cli, Commands, GenerateArgs, InspectArgs};
use lakegen::config::{GenerateConfig, InspectConfig};
use lakegen::storage::FilesystemStorage;
use lakegen::{GenError, inspect, run};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate(args) => run_generate(args).await,
        Commands::Inspect(args) => run_inspect(args).await,
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let config = GenerateConfig::from_args(&args)?;
    let summary = run::generate(&config)
        .await
        .with_context(|| format!("failed to generate events under {}", config.out.display()))?;

    if config.dry_run {
        println!(
            "dry run: {} events planned in {} partition(s)",
            summary.total_events(),
            summary.partitions.len()
        );
    } else {
        println!(
            "✅ Generated {} events in {} file(s) under {}",
            summary.total_events(),
            summary.files_written(),
            config.out.display()
        );
    }
    Ok(())
}

async fn run_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let config = InspectConfig::from_args(&args)?;
    let storage = FilesystemStorage::new(&config.root);
    let report = inspect::inspect(&storage, config.validate)
        .await
        .with_context(|| format!("failed to inspect {}", config.root.display()))?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.render());
    }

    for problem in &report.problems {
        tracing::error!(
            "{}:{}: {}",
            problem.path.display(),
            problem.line,
            problem.reason
        );
    }
    if !report.problems.is_empty() {
        return Err(GenError::MalformedRecords(report.problems.len()).into());
    }
    Ok(())
}
