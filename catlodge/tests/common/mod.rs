//! Common test utilities for integration tests.
//!
//! Helper functions and fixture builders shared by the integration
//! suites: store setup, catalog seeding, and request construction.

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use catlodge::operations::{BookingChannel, BookingRequest};
use catlodge::{AnimalId, CategoryId, Store, StoreConfig};

/// A date inside the fixture month (July 2025).
#[allow(dead_code)]
pub fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
}

/// The reference "today" used by the fixtures; all bookings start later.
#[allow(dead_code)]
pub fn today() -> NaiveDate {
    d(1)
}

/// Opens a store under the given directory.
#[allow(dead_code)]
pub fn open_store(dir: &Path) -> Store {
    Store::open(StoreConfig::new(dir.join("catlodge.db"))).unwrap()
}

/// Seeds one category (100/night) with the given unit capacities and a
/// pool of registered cats. Returns the category and the cat ids.
#[allow(dead_code)]
pub fn seed_catalog(store: &mut Store, unit_capacities: &[u32], cats: usize) -> (CategoryId, Vec<AnimalId>) {
    let category = store
        .create_category("Suite", Decimal::from(100), 4)
        .unwrap();
    for &capacity in unit_capacities {
        store.create_unit(category.id, None, capacity).unwrap();
    }
    let cat_ids = (0..cats)
        .map(|i| store.create_animal(&format!("cat-{i}"), None).unwrap().id)
        .collect();
    (category.id, cat_ids)
}

/// A staff-channel booking request for the given window and party.
#[allow(dead_code)]
pub fn staff_request(
    category: CategoryId,
    check_in: u32,
    check_out: u32,
    cats: &[AnimalId],
) -> BookingRequest {
    BookingRequest::new(Some(category), d(check_in), d(check_out), cats.to_vec())
        .with_channel(BookingChannel::Staff)
}
