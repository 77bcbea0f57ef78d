//! Confirm command implementation.

use clap::Args;

use crate::error::CliError;
use crate::utils::{engine, load_configuration, open_store, GlobalOptions};

/// Confirm a pending reservation (staff).
#[derive(Args)]
pub struct ConfirmCommand {
    /// The reservation code (CB-...)
    #[arg(value_name = "CODE")]
    pub code: String,
}

impl ConfirmCommand {
    /// Execute the confirm command.
    ///
    /// The CLI is the staff surface, so the staff-only check always
    /// passes here; guest-facing callers go through the platform API.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut store = open_store(global, &config)?;

        engine(&config).confirm(&mut store, &self.code, true)?;
        if !global.quiet {
            eprintln!("Confirmed reservation {}", self.code);
        }
        Ok(())
    }
}
