use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "workpool")]
#[command(about = "Worker pool service CLI", long_about = None)]
pub struct Cli {
    /// TOML configuration file (defaults to $WORKPOOL_CONFIG or config/workpool.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the service, push demo tasks through the pool and stop
    Run(RunArgs),
    /// Count the lines of a text file
    Lines(LinesArgs),
    /// Print the effective configuration as TOML
    Config,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Override pool.workers
    #[arg(long)]
    pub workers: Option<i64>,

    /// Number of demo tasks to process
    #[arg(long, default_value_t = 5)]
    pub tasks: usize,
}

#[derive(clap::Args, Debug)]
pub struct LinesArgs {
    /// File to read
    pub path: PathBuf,
}
