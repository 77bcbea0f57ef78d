//! Init command implementation.

use clap::Args;

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, resolve_data_dir, GlobalOptions};

/// Initialize the data directory and store.
#[derive(Args)]
pub struct InitCommand {}

impl InitCommand {
    /// Execute the init command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let data_dir = resolve_data_dir(global, &config)?;
        let _store = open_store(global, &config)?;
        if !global.quiet {
            println!("Initialized catlodge store in {}", data_dir.display());
        }
        Ok(())
    }
}
