//! Add-unit command implementation.

use clap::Args;

use catlodge::CategoryId;

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, GlobalOptions};

/// Add a physical unit to a category.
#[derive(Args)]
pub struct AddUnitCommand {
    /// The owning category id
    #[arg(long, value_name = "ID")]
    pub category: i64,

    /// Optional unit label ("Garden Room")
    #[arg(long, value_name = "LABEL")]
    pub label: Option<String>,

    /// Maximum number of cats the unit can hold concurrently
    #[arg(long, value_name = "CATS")]
    pub capacity: u32,
}

impl AddUnitCommand {
    /// Execute the add-unit command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut store = open_store(global, &config)?;

        let unit = store.create_unit(
            CategoryId::new(self.category),
            self.label.as_deref(),
            self.capacity,
        )?;
        println!("{}", unit.id);
        if !global.quiet {
            eprintln!(
                "Created {} (capacity {}) in category {}",
                unit.display_label(),
                unit.capacity,
                unit.category_id
            );
        }
        Ok(())
    }
}
