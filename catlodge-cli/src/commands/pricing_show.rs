//! Pricing-show command implementation.

use clap::Args;

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, GlobalOptions};

/// Show the active pricing configuration.
#[derive(Args)]
pub struct PricingShowCommand {}

impl PricingShowCommand {
    /// Execute the pricing-show command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let store = open_store(global, &config)?;

        match store.load_pricing_config_data()? {
            Some((version, data)) => {
                if !global.quiet {
                    eprintln!("Active pricing configuration (version {version}):");
                }
                let json = serde_json::to_string_pretty(&data)
                    .map_err(|e| CliError::Config(e.to_string()))?;
                println!("{json}");
            }
            None => {
                println!("{{}}");
                if !global.quiet {
                    eprintln!("No pricing configuration stored; all discounts disabled.");
                }
            }
        }
        Ok(())
    }
}
