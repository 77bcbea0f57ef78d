//! Add-service command implementation.

use clap::Args;

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, parse_money, GlobalOptions};

/// Add a boarding add-on service.
#[derive(Args)]
pub struct AddServiceCommand {
    /// Service display name
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// Per-unit price, e.g. 25.00
    #[arg(long, value_name = "AMOUNT")]
    pub price: String,
}

impl AddServiceCommand {
    /// Execute the add-service command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let price = parse_money(&self.price)?;
        let config = load_configuration(global)?;
        let mut store = open_store(global, &config)?;

        let service = store.create_service(&self.name, price)?;
        println!("{}", service.id);
        if !global.quiet {
            eprintln!("Created service '{}' ({})", service.name, service.price);
        }
        Ok(())
    }
}
