//! Pricing-import command implementation.

use std::path::PathBuf;

use clap::Args;

use catlodge::PricingConfigData;

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, GlobalOptions};

/// Import a pricing configuration from a JSON file.
///
/// The file uses the platform's wire shape (`multiCatDiscountEnabled`,
/// `multiCatDiscounts`, ...). Tier lists are normalized (sorted, duplicate
/// keys keep the last value) before being stored.
#[derive(Args)]
pub struct PricingImportCommand {
    /// Path to the JSON payload
    #[arg(long, value_name = "FILE")]
    pub file: PathBuf,

    /// Fail unless the stored configuration still has this version
    #[arg(long, value_name = "VERSION")]
    pub expect_version: Option<u64>,
}

impl PricingImportCommand {
    /// Execute the pricing-import command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let text = std::fs::read_to_string(&self.file)?;
        let data: PricingConfigData = serde_json::from_str(&text)
            .map_err(|e| CliError::InvalidArguments(format!("invalid pricing payload: {e}")))?;

        let config = load_configuration(global)?;
        let mut store = open_store(global, &config)?;

        let version = store.save_pricing_config(&data, self.expect_version)?;
        println!("{version}");
        if !global.quiet {
            eprintln!("Stored pricing configuration version {version}");
        }
        Ok(())
    }
}
