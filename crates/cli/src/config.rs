//! Command-line configuration.

use crate::commands::{Command, CommandResult};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Inspect and compare IPv4/IPv6 endpoints.
#[derive(Debug, Parser)]
#[command(name = "endpoint-cli", version, about)]
pub struct CliConfig {
    /// Log rejected inputs and conversions (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Installs logging, runs the command and prints its report.
    pub fn run(self) -> anyhow::Result<()> {
        self.init_tracing();
        let result: CommandResult = self.command.execute()?;
        println!("{}", result);
        Ok(())
    }

    fn init_tracing(&self) {
        let default = if self.verbose { "debug" } else { "warn" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        // A subscriber may already be installed when embedded in tests.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}
