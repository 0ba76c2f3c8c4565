use anyhow::Result;
use clap::Args;
use colored::Colorize;
use log::{error, info};
use work_items_e2e::config::RunConfig;
use work_items_e2e::scenario::{self, EventTypeSelection, RunOptions};

#[derive(Args)]
pub struct RunCommand {
    /// Seed for fixture data and event type selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Apply one event per fetched event type instead of a random one
    #[arg(long)]
    pub all_event_types: bool,
}

/// Returns whether every case passed
pub async fn run_command(config: &RunConfig, command: &RunCommand) -> Result<bool> {
    let options = RunOptions {
        seed: command.seed,
        event_type_selection: if command.all_event_types {
            EventTypeSelection::All
        } else {
            EventTypeSelection::Random
        },
    };

    info!("Starting suite against {} (tenant {})", config.base_url, config.credentials.tenant_id);
    println!("Running tag suite against {}", config.base_url.bold());

    match scenario::run_suite(config, &options).await {
        Ok(report) => {
            report.print_summary();
            Ok(report.is_success())
        }
        Err(e) => {
            error!("Suite setup failed: {}", e);
            println!("{} {}: {}", "✗".red(), e.kind().yellow(), e);
            println!("{}", "Run aborted before any case executed".red().bold());
            Ok(false)
        }
    }
}
