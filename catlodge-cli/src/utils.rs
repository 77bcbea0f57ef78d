//! Utility functions for CLI operations.
//!
//! Configuration loading, store opening, argument parsing helpers, and
//! output formatting shared across commands.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use catlodge::operations::{AddonRequest, BookingEngine};
use catlodge::pricing::PriceBreakdown;
use catlodge::{ConfigBuilder, EngineConfig, ServiceId, Store, StoreConfig};

use crate::error::CliError;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // Fields used via pattern matching in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the default store busy timeout (in seconds).
    pub busy_timeout: Option<u32>,
}

/// Resolves the data directory: flag, then config/env, then `~/.catlodge`.
pub fn resolve_data_dir(global: &GlobalOptions, config: &EngineConfig) -> Result<PathBuf, CliError> {
    if let Some(ref dir) = global.data_dir {
        return Ok(dir.clone());
    }
    if let Some(ref dir) = config.data_dir {
        return Ok(dir.clone());
    }
    let home = home::home_dir()
        .ok_or_else(|| CliError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(".catlodge"))
}

/// Loads the engine configuration, reading `config.yaml` from the data
/// directory when present.
pub fn load_configuration(global: &GlobalOptions) -> Result<EngineConfig, CliError> {
    let mut builder = ConfigBuilder::new().with_data_dir(global.data_dir.clone());
    if let Some(ref dir) = global.data_dir {
        builder = builder.with_file(dir.join("config.yaml"));
    } else if let Some(home) = home::home_dir() {
        builder = builder.with_file(home.join(".catlodge").join("config.yaml"));
    }
    builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Opens the store under the resolved data directory.
pub fn open_store(global: &GlobalOptions, config: &EngineConfig) -> Result<Store, CliError> {
    let data_dir = resolve_data_dir(global, config)?;
    let mut store_config = StoreConfig::new(data_dir.join("catlodge.db"));

    if let Some(seconds) = global.busy_timeout {
        store_config = store_config.with_busy_timeout(Duration::from_secs(seconds.into()));
    } else if let Some(seconds) = config.maximum_lock_wait_seconds {
        store_config = store_config.with_busy_timeout(Duration::from_secs(seconds));
    }

    Store::open(store_config).map_err(CliError::from)
}

/// Builds the engine from the loaded configuration.
pub fn engine(config: &EngineConfig) -> BookingEngine {
    BookingEngine::from_config(config)
}

/// Today's date, used to validate check-in dates.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parses a `YYYY-MM-DD` date argument.
pub fn parse_date(text: &str) -> Result<NaiveDate, CliError> {
    text.parse()
        .map_err(|_| CliError::InvalidArguments(format!("invalid date '{text}', expected YYYY-MM-DD")))
}

/// Parses a decimal money argument.
pub fn parse_money(text: &str) -> Result<Decimal, CliError> {
    text.parse()
        .map_err(|_| CliError::InvalidArguments(format!("invalid amount '{text}'")))
}

/// Parses an add-on argument of the form `SERVICE_ID:QUANTITY` (a bare
/// `SERVICE_ID` means quantity 1).
pub fn parse_addon(text: &str) -> Result<AddonRequest, CliError> {
    let (service, quantity) = match text.split_once(':') {
        Some((service, quantity)) => (service, quantity),
        None => (text, "1"),
    };
    let service_id: i64 = service
        .trim()
        .parse()
        .map_err(|_| CliError::InvalidArguments(format!("invalid service id '{service}'")))?;
    let quantity: u32 = quantity
        .trim()
        .parse()
        .map_err(|_| CliError::InvalidArguments(format!("invalid quantity '{quantity}'")))?;
    Ok(AddonRequest {
        service_id: ServiceId::new(service_id),
        quantity,
    })
}

/// Prints an itemized price breakdown.
pub fn print_breakdown(breakdown: &PriceBreakdown) {
    println!("  base:      {}", breakdown.base);
    for discount in &breakdown.discounts {
        match discount.tier_key {
            Some(key) => println!(
                "  -{} ({} tier {}, {}%)",
                discount.amount_off, discount.kind, key, discount.percent
            ),
            None => println!(
                "  -{} ({} flat, {}%)",
                discount.amount_off, discount.kind, discount.percent
            ),
        }
    }
    if breakdown.addons_total > Decimal::ZERO {
        println!("  add-ons:   {}", breakdown.addons_total);
    }
    println!("  total:     {}", breakdown.total);
}
