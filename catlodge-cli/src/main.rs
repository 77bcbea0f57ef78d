//! Main entry point for the catlodge CLI.
//!
//! This is the operator command-line interface for the catlodge boarding
//! engine. It covers catalog management (`add-category`, `add-unit`,
//! `add-cat`, `add-service`), pricing configuration (`pricing-show`,
//! `pricing-import`), availability and quoting, and the reservation
//! lifecycle (`book`, `confirm`, `check-in`, `check-out`, `cancel`).

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    let _logger = catlodge::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
    };

    let result = match cli.command {
        cli::Command::Init(cmd) => cmd.execute(&global),
        cli::Command::AddCategory(cmd) => cmd.execute(&global),
        cli::Command::AddUnit(cmd) => cmd.execute(&global),
        cli::Command::AddCat(cmd) => cmd.execute(&global),
        cli::Command::AddService(cmd) => cmd.execute(&global),
        cli::Command::PricingShow(cmd) => cmd.execute(&global),
        cli::Command::PricingImport(cmd) => cmd.execute(&global),
        cli::Command::Availability(cmd) => cmd.execute(&global),
        cli::Command::Quote(cmd) => cmd.execute(&global),
        cli::Command::Book(cmd) => cmd.execute(&global),
        cli::Command::Confirm(cmd) => cmd.execute(&global),
        cli::Command::CheckIn(cmd) => cmd.execute(&global),
        cli::Command::CheckOut(cmd) => cmd.execute(&global),
        cli::Command::Cancel(cmd) => cmd.execute(&global),
        cli::Command::List(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
