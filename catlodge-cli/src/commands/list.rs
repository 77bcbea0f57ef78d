//! List command implementation.

use clap::Args;

use catlodge::ReservationStatus;

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, GlobalOptions};

/// List reservations.
#[derive(Args)]
pub struct ListCommand {
    /// Only show reservations with this status
    /// (PENDING, CONFIRMED, CHECKED_IN, CHECKED_OUT, CANCELLED)
    #[arg(long, value_name = "STATUS")]
    pub status: Option<String>,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let status = self
            .status
            .as_deref()
            .map(ReservationStatus::parse)
            .transpose()
            .map_err(|e| CliError::InvalidArguments(e.to_string()))?;

        let config = load_configuration(global)?;
        let store = open_store(global, &config)?;

        let reservations = store.list_reservations(status)?;
        if reservations.is_empty() {
            if !global.quiet {
                eprintln!("No reservations.");
            }
            return Ok(());
        }

        for reservation in reservations {
            println!(
                "{}\t{}\tcategory {}\t{}\t{} cat(s)\t{}",
                reservation.code,
                reservation.status,
                reservation.category_id,
                reservation.stay,
                reservation.party_size(),
                reservation.total,
            );
        }
        Ok(())
    }
}
