//! Persistent storage for the boarding engine.
//!
//! This module provides a `SQLite`-based storage layer for the catalog
//! (categories, units, animals, services), reservations with their
//! assignments, and the single active pricing-configuration snapshot. It
//! also materializes the plain snapshots the pure scheduling core consumes.
//!
//! # Examples
//!
//! ```no_run
//! use catlodge::store::{Store, StoreConfig};
//! use rust_decimal::Decimal;
//!
//! let mut store = Store::open(StoreConfig::new("/tmp/catlodge.db")).unwrap();
//! let suite = store
//!     .create_category("Suite", Decimal::from(100), 4)
//!     .unwrap();
//! let unit = store.create_unit(suite.id, None, 4).unwrap();
//! println!("created {} in category {}", unit.id, suite.name);
//! ```

mod config;
mod connection;
pub mod migrations;
mod operations;
mod schema;
#[cfg(test)]
pub mod test_util;

pub use config::StoreConfig;
pub use connection::Store;
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
