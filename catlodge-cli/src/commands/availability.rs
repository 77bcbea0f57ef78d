//! Availability command implementation.

use clap::Args;

use catlodge::CategoryId;

use crate::error::CliError;
use crate::utils::{engine, load_configuration, open_store, parse_date, GlobalOptions};

/// Show unit availability for a category and date range.
#[derive(Args)]
pub struct AvailabilityCommand {
    /// The accommodation category id
    #[arg(long, value_name = "ID")]
    pub category: i64,

    /// Check-in date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub check_in: String,

    /// Check-out date (YYYY-MM-DD, exclusive)
    #[arg(long, value_name = "DATE")]
    pub check_out: String,

    /// Party size the units must accommodate
    #[arg(long, value_name = "CATS", default_value_t = 1)]
    pub party: u32,
}

impl AvailabilityCommand {
    /// Execute the availability command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let check_in = parse_date(&self.check_in)?;
        let check_out = parse_date(&self.check_out)?;
        let config = load_configuration(global)?;
        let store = open_store(global, &config)?;

        let free = engine(&config).availability(
            &store,
            CategoryId::new(self.category),
            check_in,
            check_out,
            self.party,
        )?;

        if free.is_empty() {
            if !global.quiet {
                eprintln!("No unit can take a party of {} for these dates.", self.party);
            }
            return Ok(());
        }

        for unit in free {
            println!(
                "{}\tfree {}/{}{}",
                unit.unit_id,
                unit.min_free_capacity,
                unit.capacity,
                if unit.occupied { "\t(shared)" } else { "" }
            );
        }
        Ok(())
    }
}
