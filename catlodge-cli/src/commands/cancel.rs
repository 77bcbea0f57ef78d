//! Cancel command implementation.

use clap::Args;

use crate::error::CliError;
use crate::utils::{engine, load_configuration, open_store, GlobalOptions};

/// Cancel a reservation that has not yet checked in.
#[derive(Args)]
pub struct CancelCommand {
    /// The reservation code (CB-...)
    #[arg(value_name = "CODE")]
    pub code: String,
}

impl CancelCommand {
    /// Execute the cancel command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut store = open_store(global, &config)?;

        engine(&config).cancel(&mut store, &self.code)?;
        if !global.quiet {
            eprintln!("Cancelled reservation {}", self.code);
        }
        Ok(())
    }
}
