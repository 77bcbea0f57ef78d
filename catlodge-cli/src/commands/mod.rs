//! Command implementations.

mod add_cat;
mod add_category;
mod add_service;
mod add_unit;
mod availability;
mod book;
mod cancel;
mod check_in;
mod check_out;
mod confirm;
mod init;
mod list;
mod pricing_import;
mod pricing_show;
mod quote;

pub use add_cat::AddCatCommand;
pub use add_category::AddCategoryCommand;
pub use add_service::AddServiceCommand;
pub use add_unit::AddUnitCommand;
pub use availability::AvailabilityCommand;
pub use book::BookCommand;
pub use cancel::CancelCommand;
pub use check_in::CheckInCommand;
pub use check_out::CheckOutCommand;
pub use confirm::ConfirmCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use pricing_import::PricingImportCommand;
pub use pricing_show::PricingShowCommand;
pub use quote::QuoteCommand;
