//! Check-in command implementation.

use clap::Args;

use crate::error::CliError;
use crate::utils::{engine, load_configuration, open_store, GlobalOptions};

/// Check a reservation in, locking its unit assignment.
#[derive(Args)]
pub struct CheckInCommand {
    /// The reservation code (CB-...)
    #[arg(value_name = "CODE")]
    pub code: String,
}

impl CheckInCommand {
    /// Execute the check-in command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut store = open_store(global, &config)?;

        engine(&config).check_in(&mut store, &self.code)?;
        if !global.quiet {
            eprintln!("Checked in reservation {} (assignment locked)", self.code);
        }
        Ok(())
    }
}
