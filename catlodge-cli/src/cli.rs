//! CLI structure and command definitions.
//!
//! The main CLI structure using clap's derive macros, with global options
//! and one subcommand per operation.

use crate::commands::{
    AddCatCommand, AddCategoryCommand, AddServiceCommand, AddUnitCommand, AvailabilityCommand,
    BookCommand, CancelCommand, CheckInCommand, CheckOutCommand, ConfirmCommand, InitCommand,
    ListCommand, PricingImportCommand, PricingShowCommand, QuoteCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for the catlodge boarding reservation engine.
#[derive(Parser)]
#[command(name = "catlodge")]
#[command(version, about = "Manage cat boarding reservations", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "CATLODGE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default store busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "CATLODGE_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and store
    Init(InitCommand),

    /// Add an accommodation category (room type)
    AddCategory(AddCategoryCommand),

    /// Add a physical unit to a category
    AddUnit(AddUnitCommand),

    /// Register a cat
    AddCat(AddCatCommand),

    /// Add a boarding add-on service
    AddService(AddServiceCommand),

    /// Show the active pricing configuration
    PricingShow(PricingShowCommand),

    /// Import a pricing configuration from a JSON file
    PricingImport(PricingImportCommand),

    /// Show unit availability for a category and date range
    Availability(AvailabilityCommand),

    /// Price a prospective stay without booking it
    Quote(QuoteCommand),

    /// Book a stay
    Book(BookCommand),

    /// Confirm a pending reservation (staff)
    Confirm(ConfirmCommand),

    /// Check a reservation in
    CheckIn(CheckInCommand),

    /// Check a reservation out
    CheckOut(CheckOutCommand),

    /// Cancel a reservation
    Cancel(CancelCommand),

    /// List reservations
    List(ListCommand),
}
