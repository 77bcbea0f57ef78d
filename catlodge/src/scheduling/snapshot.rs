//! Read-model snapshots consumed by the pure scheduling core.
//!
//! The store materializes these under the category lock; the conflict
//! detector, availability resolver, and allocator never see a database
//! handle.

use std::collections::HashMap;

use crate::category::{AccommodationCategory, Unit, UnitId};
use crate::reservation::{AnimalId, ReservationCode, ReservationId, ReservationStatus};
use crate::stay::StayRange;

/// One existing booking of an animal, as seen by the conflict detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingWindow {
    /// The reservation the animal belongs to.
    pub reservation_id: ReservationId,
    /// Its human-facing code, for conflict reporting.
    pub code: ReservationCode,
    /// The boarded interval.
    pub stay: StayRange,
    /// The reservation's current status.
    pub status: ReservationStatus,
}

/// Per-animal index of existing bookings, with display names.
///
/// Animals are registered up front (even when they have no bookings) so
/// the index doubles as the existence check for a requested party.
#[derive(Debug, Clone, Default)]
pub struct AnimalBookings {
    entries: HashMap<AnimalId, AnimalEntry>,
}

#[derive(Debug, Clone)]
struct AnimalEntry {
    name: String,
    windows: Vec<BookingWindow>,
}

impl AnimalBookings {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an animal. A second registration with the same id keeps
    /// the latest name.
    pub fn register(&mut self, animal_id: AnimalId, name: impl Into<String>) {
        let entry = self.entries.entry(animal_id).or_insert_with(|| AnimalEntry {
            name: String::new(),
            windows: Vec::new(),
        });
        entry.name = name.into();
    }

    /// Records a booking window for a registered animal. Windows for
    /// unregistered animals are ignored.
    pub fn add_booking(&mut self, animal_id: AnimalId, window: BookingWindow) {
        if let Some(entry) = self.entries.get_mut(&animal_id) {
            entry.windows.push(window);
        }
    }

    /// Returns `true` if the animal was registered.
    #[must_use]
    pub fn contains(&self, animal_id: AnimalId) -> bool {
        self.entries.contains_key(&animal_id)
    }

    /// Returns the display name of a registered animal.
    #[must_use]
    pub fn name_of(&self, animal_id: AnimalId) -> Option<&str> {
        self.entries.get(&animal_id).map(|e| e.name.as_str())
    }

    /// Returns the booking windows of a registered animal.
    #[must_use]
    pub fn bookings_of(&self, animal_id: AnimalId) -> &[BookingWindow] {
        self.entries
            .get(&animal_id)
            .map_or(&[], |e| e.windows.as_slice())
    }
}

/// One assignment overlapping the window of interest, as seen by the
/// availability resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentWindow {
    /// The assigned unit.
    pub unit_id: UnitId,
    /// The owning reservation.
    pub reservation_id: ReservationId,
    /// Capacity the party consumes.
    pub animal_count: u32,
    /// The reservation's boarded interval.
    pub stay: StayRange,
    /// The reservation's current status.
    pub status: ReservationStatus,
}

/// Everything the resolver and allocator need to know about one category.
#[derive(Debug, Clone)]
pub struct CategorySnapshot {
    /// The category itself.
    pub category: AccommodationCategory,
    /// All units of the category, active or not.
    pub units: Vec<Unit>,
    /// Assignments of reservations in this category, any status.
    pub assignments: Vec<AssignmentWindow>,
}

impl CategorySnapshot {
    /// Iterates over the in-service units.
    pub fn active_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.active)
    }

    /// Returns the largest capacity among active units, if any.
    #[must_use]
    pub fn max_active_unit_capacity(&self) -> Option<u32> {
        self.active_units().map(|u| u.capacity).max()
    }
}
