use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

mod cli;

use cli::commands::{fixture_command, run_command, token_command};
use cli::{Cli, Commands};
use work_items_e2e::config::HarnessConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(path) = &cli.log_file {
        // Truncate on each run
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {:?}", path))?;
        logger.target(env_logger::Target::Pipe(Box::new(log_file)));
    }
    logger.init();

    info!("Starting work-items-e2e");

    let succeeded = match &cli.command {
        Commands::Fixture(command) => {
            fixture_command(command)?;
            true
        }
        Commands::Run(command) => {
            let config = load_run_config(&cli)?;
            run_command(&config, command).await?
        }
        Commands::Token => {
            let config = load_run_config(&cli)?;
            token_command(&config).await?
        }
    };

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

fn load_run_config(cli: &Cli) -> Result<work_items_e2e::config::RunConfig> {
    let config = HarnessConfig::load_with_env(cli.config.as_deref())?;
    debug!("Loaded config: {:?}", config);
    config.validate()
}
