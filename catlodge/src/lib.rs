#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # catlodge
//!
//! A reservation scheduling and pricing engine for cat boarding
//! facilities.
//!
//! The engine takes a booking request (date range, party of cats,
//! accommodation category), detects scheduling conflicts, allocates a
//! physical unit under capacity and sharing constraints, and prices the
//! stay under stacked, independently configurable discount tiers. The
//! hard logic is a pure-function core over plain snapshots; a thin
//! `SQLite` adapter and a category-scoped locking discipline wrap it.
//!
//! ## Core Types
//!
//! - [`StayRange`]: validated half-open boarding interval
//! - [`AccommodationCategory`] and [`Unit`]: the bookable catalog
//! - [`Reservation`], [`ReservationStatus`], [`UnitAssignment`]: bookings
//!   and their unit bindings
//! - [`operations::BookingEngine`]: the facade tying it all together
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use catlodge::StayRange;
//!
//! let stay = StayRange::new(
//!     NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
//!     NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
//! ).unwrap();
//! assert_eq!(stay.nights(), 2);
//!
//! // Back-to-back stays never overlap.
//! let next = StayRange::new(
//!     NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
//!     NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
//! ).unwrap();
//! assert!(!stay.overlaps(&next));
//! ```

pub mod assignment;
pub mod category;
pub mod config;
pub mod error;
pub mod logging;
pub mod operations;
pub mod pricing;
pub mod reservation;
pub mod scheduling;
pub mod stay;
pub mod store;

// Re-export key types at crate root for convenience
pub use assignment::UnitAssignment;
pub use category::{AccommodationCategory, CategoryId, Unit, UnitId};
pub use config::{ConfigBuilder, EngineConfig};
pub use error::{CatConflict, Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{
    BookingChannel, BookingEngine, BookingRequest, CancelToken, ExecutionResult, OperationPlan,
};
pub use pricing::{DiscountPolicy, PriceBreakdown, PricingConfig, PricingConfigData};
pub use reservation::{
    AddonLine, Animal, AnimalId, BoardingService, CustomerId, Reservation, ReservationCode,
    ReservationDraft, ReservationId, ReservationStatus, ServiceId,
};
pub use stay::StayRange;
pub use store::{Store, StoreConfig};
