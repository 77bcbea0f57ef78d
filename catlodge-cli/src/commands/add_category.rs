//! Add-category command implementation.

use clap::Args;

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, parse_money, GlobalOptions};

/// Add an accommodation category (room type).
#[derive(Args)]
pub struct AddCategoryCommand {
    /// Category display name
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// Nightly rate, e.g. 100.00
    #[arg(long, value_name = "AMOUNT")]
    pub rate: String,

    /// Default capacity for units of this category
    #[arg(long, value_name = "CATS")]
    pub capacity: u32,
}

impl AddCategoryCommand {
    /// Execute the add-category command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let rate = parse_money(&self.rate)?;
        let config = load_configuration(global)?;
        let mut store = open_store(global, &config)?;

        let category = store.create_category(&self.name, rate, self.capacity)?;
        println!("{}", category.id);
        if !global.quiet {
            eprintln!(
                "Created category '{}' ({}/night, capacity {})",
                category.name, category.nightly_rate, category.unit_capacity
            );
        }
        Ok(())
    }
}
