use super::commands::{FixtureCommand, RunCommand};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "work-items-e2e")]
#[command(about = "End-to-end checks for the work-items tagging API")]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the tag scenario suite against the configured service
    Run(RunCommand),
    /// Acquire a token to check the configured credentials
    Token,
    /// Print a generated tag payload
    Fixture(FixtureCommand),
}
