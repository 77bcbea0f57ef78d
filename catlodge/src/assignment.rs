//! Unit assignment types.
//!
//! A unit assignment binds a reservation to one physical unit. The binding
//! is tentative until check-in, when it is locked; a locked assignment is
//! immutable for the rest of the reservation's life.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::UnitId;
use crate::reservation::ReservationId;

/// A reservation-to-unit binding with the capacity it consumes.
///
/// # Examples
///
/// ```
/// use catlodge::{ReservationId, UnitAssignment, UnitId};
///
/// let mut assignment = UnitAssignment::tentative(
///     ReservationId::new(1),
///     UnitId::new(3),
///     2,
/// );
/// assert!(!assignment.is_locked());
///
/// let now = chrono::Utc::now();
/// assignment.lock(now);
/// assert!(assignment.is_locked());
///
/// // Locking again never moves the original timestamp.
/// assignment.lock(now + chrono::Duration::hours(1));
/// assert_eq!(assignment.locked_at, Some(now));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitAssignment {
    /// The assigned reservation.
    pub reservation_id: ReservationId,
    /// The physical unit.
    pub unit_id: UnitId,
    /// Number of cats consuming capacity in the unit.
    pub animal_count: u32,
    /// Set at check-in. Once set, the binding is immutable.
    pub locked_at: Option<DateTime<Utc>>,
}

impl UnitAssignment {
    /// Creates a tentative (unlocked) assignment.
    #[must_use]
    pub const fn tentative(
        reservation_id: ReservationId,
        unit_id: UnitId,
        animal_count: u32,
    ) -> Self {
        Self {
            reservation_id,
            unit_id,
            animal_count,
            locked_at: None,
        }
    }

    /// Returns `true` if the assignment has been locked at check-in.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked_at.is_some()
    }

    /// Locks the assignment. Idempotent: an existing lock timestamp is
    /// never overwritten, keeping `locked_at` monotonic.
    pub fn lock(&mut self, at: DateTime<Utc>) {
        if self.locked_at.is_none() {
            self.locked_at = Some(at);
        }
    }
}
