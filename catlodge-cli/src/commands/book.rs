//! Book command implementation.

use clap::Args;

use catlodge::operations::{BookingChannel, BookingRequest};
use catlodge::{AnimalId, CategoryId, CustomerId};

use crate::error::CliError;
use crate::utils::{
    engine, load_configuration, open_store, parse_addon, parse_date, print_breakdown, today,
    GlobalOptions,
};

/// Book a stay.
#[derive(Args)]
pub struct BookCommand {
    /// The accommodation category id
    #[arg(long, value_name = "ID")]
    pub category: i64,

    /// Check-in date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub check_in: String,

    /// Check-out date (YYYY-MM-DD, exclusive)
    #[arg(long, value_name = "DATE")]
    pub check_out: String,

    /// Cat id (repeat for multi-cat parties)
    #[arg(long = "cat", value_name = "ID", required = true)]
    pub cats: Vec<i64>,

    /// Request a unit without other parties
    #[arg(long)]
    pub no_sharing: bool,

    /// Booking customer id (required for guest bookings)
    #[arg(long, value_name = "ID")]
    pub customer: Option<i64>,

    /// Book through the staff channel (starts CONFIRMED)
    #[arg(long)]
    pub staff: bool,

    /// Add-on service as SERVICE_ID[:QUANTITY] (repeatable)
    #[arg(long = "addon", value_name = "SERVICE[:QTY]")]
    pub addons: Vec<String>,

    /// Free-text notes for the operators
    #[arg(long, value_name = "TEXT")]
    pub notes: Option<String>,

    /// Show the plan and quote without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl BookCommand {
    /// Execute the book command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let dry_run = self.dry_run;
        let request = self.into_request()?;
        let config = load_configuration(global)?;
        let mut store = open_store(global, &config)?;
        let engine = engine(&config);

        if dry_run {
            let breakdown = engine.quote(&store, &request, today())?;
            if !global.quiet {
                eprintln!("Dry run - would book at this price:");
            }
            print_breakdown(&breakdown);
            return Ok(());
        }

        let result = engine.book(&mut store, &request, today(), None)?;
        let created = result.reservation.ok_or_else(|| {
            CliError::Config("booking succeeded without a created reservation".to_string())
        })?;

        println!("{}", created.code);
        if !global.quiet {
            if let Some(unit_id) = created.unit_id {
                eprintln!("Assigned to unit {unit_id}");
            }
            if let Some(breakdown) = &result.breakdown {
                print_breakdown(breakdown);
            }
        }
        Ok(())
    }

    fn into_request(self) -> Result<BookingRequest, CliError> {
        let check_in = parse_date(&self.check_in)?;
        let check_out = parse_date(&self.check_out)?;
        let addons = self
            .addons
            .iter()
            .map(|text| parse_addon(text))
            .collect::<Result<Vec<_>, _>>()?;
        let channel = if self.staff {
            BookingChannel::Staff
        } else {
            BookingChannel::Guest
        };

        Ok(BookingRequest::new(
            Some(CategoryId::new(self.category)),
            check_in,
            check_out,
            self.cats.iter().copied().map(AnimalId::new).collect(),
        )
        .with_allow_sharing(!self.no_sharing)
        .with_customer(self.customer.map(CustomerId::new))
        .with_addons(addons)
        .with_special_requests(self.notes)
        .with_channel(channel))
    }
}
