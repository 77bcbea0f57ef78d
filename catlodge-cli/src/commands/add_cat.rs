//! Add-cat command implementation.

use clap::Args;

use catlodge::CustomerId;

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, GlobalOptions};

/// Register a cat.
#[derive(Args)]
pub struct AddCatCommand {
    /// The cat's display name
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// Owning customer id
    #[arg(long, value_name = "ID")]
    pub customer: Option<i64>,
}

impl AddCatCommand {
    /// Execute the add-cat command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut store = open_store(global, &config)?;

        let animal = store.create_animal(&self.name, self.customer.map(CustomerId::new))?;
        println!("{}", animal.id);
        if !global.quiet {
            eprintln!("Registered cat '{}'", animal.name);
        }
        Ok(())
    }
}
