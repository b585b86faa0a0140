use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lakegen",
    version,
    about = "Generate synthetic bank-like events for the raw zone of a data lake"
)]
pub struct Cli {
    /// Turn verbose logging on
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write JSONL events partitioned by day and source
    Generate(GenerateArgs),
    /// Count part files and events per partition of an existing tree
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Output root folder
    #[arg(long, env = "LAKEGEN_OUT", default_value = "data/raw", value_name = "DIR")]
    pub out: PathBuf,

    /// End day (YYYY-MM-DD, UTC); defaults to today
    #[arg(long, env = "LAKEGEN_DAY", value_name = "YYYY-MM-DD")]
    pub day: Option<String>,

    /// Number of days back, including --day
    #[arg(long, env = "LAKEGEN_DAYS", default_value_t = 1)]
    pub days: u32,

    /// Total events per day across all selected sources
    #[arg(long, env = "LAKEGEN_TOTAL_EVENTS", default_value_t = 60_000)]
    pub total_events: u64,

    /// Events per part file (keep it large to keep object PUTs low)
    #[arg(long, env = "LAKEGEN_EVENTS_PER_FILE", default_value_t = 60_000)]
    pub events_per_file: u64,

    /// Seed for reproducible output
    #[arg(long, env = "LAKEGEN_SEED", default_value_t = 42)]
    pub seed: u64,

    /// Comma separated subset of sources (payments,billing,crm,erp,support)
    #[arg(long, env = "LAKEGEN_SOURCES", value_delimiter = ',', value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// Partitions generated concurrently; defaults to the available parallelism
    #[arg(short, long, env = "LAKEGEN_JOBS")]
    pub jobs: Option<usize>,

    /// Plan and log partitions without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Root folder of a generated tree
    #[arg(long, env = "LAKEGEN_OUT", default_value = "data/raw", value_name = "DIR")]
    pub out: PathBuf,

    /// Parse every line and check the fields downstream jobs rely on
    #[arg(long)]
    pub validate: bool,

    /// Print the report as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
