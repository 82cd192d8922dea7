mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use workpool::config::Config;
use workpool::observability;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let loaded = match cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    let config = loaded.as_ref().cloned().unwrap_or_default();
    observability::init_tracing(&config.logging)?;

    if let Err(e) = &loaded {
        tracing::error!(error = %e, "config error, falling back to defaults");
    }

    match cli.command {
        Commands::Run(args) => commands::run(config, args).await?,
        Commands::Lines(args) => commands::count_lines(&config, args)?,
        Commands::Config => commands::show_config(&config)?,
    }

    Ok(())
}
