//! Quote command implementation.

use clap::Args;

use catlodge::operations::{BookingChannel, BookingRequest};
use catlodge::{AnimalId, CategoryId};

use crate::error::CliError;
use crate::utils::{
    engine, load_configuration, open_store, parse_addon, parse_date, print_breakdown, today,
    GlobalOptions,
};

/// Price a prospective stay without booking it.
#[derive(Args)]
pub struct QuoteCommand {
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

    /// Add-on service as SERVICE_ID[:QUANTITY] (repeatable)
    #[arg(long = "addon", value_name = "SERVICE[:QTY]")]
    pub addons: Vec<String>,
}

impl QuoteCommand {
    /// Execute the quote command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let request = self.into_request()?;
        let config = load_configuration(global)?;
        let store = open_store(global, &config)?;

        let breakdown = engine(&config).quote(&store, &request, today())?;
        print_breakdown(&breakdown);
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

        Ok(BookingRequest::new(
            Some(CategoryId::new(self.category)),
            check_in,
            check_out,
            self.cats.iter().copied().map(AnimalId::new).collect(),
        )
        .with_allow_sharing(!self.no_sharing)
        .with_addons(addons)
        .with_channel(BookingChannel::Staff))
    }
}
