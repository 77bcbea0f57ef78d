//! Check-out command implementation.

use clap::Args;

use crate::error::CliError;
use crate::utils::{engine, load_configuration, open_store, GlobalOptions};

/// Check a reservation out, releasing its capacity.
#[derive(Args)]
pub struct CheckOutCommand {
    /// The reservation code (CB-...)
    #[arg(value_name = "CODE")]
    pub code: String,
}

impl CheckOutCommand {
    /// Execute the check-out command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut store = open_store(global, &config)?;

        engine(&config).check_out(&mut store, &self.code)?;
        if !global.quiet {
            eprintln!("Checked out reservation {}", self.code);
        }
        Ok(())
    }
}
