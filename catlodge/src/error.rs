//! Error types for the catlodge engine.
//!
//! This module provides the error hierarchy for all scheduling, pricing,
//! and lifecycle operations, using `thiserror` for ergonomic error handling.
//! Every user-facing failure carries a stable machine-readable code (see
//! [`Error::code`]) matching the platform's reservation error taxonomy.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::category::{CategoryId, UnitId};
use crate::reservation::{AnimalId, ReservationStatus, ServiceId};

/// Result type alias for operations that may fail with an engine error.
///
/// # Examples
///
/// ```
/// use catlodge::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// A single animal-level scheduling conflict.
///
/// Conflicts are reported with the animal's display name, not just its id,
/// so operators can act on them directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatConflict {
    /// The animal that is double-booked.
    pub animal_id: AnimalId,
    /// The animal's display name.
    pub animal_name: String,
    /// Code of the reservation it already belongs to.
    pub reservation_code: String,
}

impl std::fmt::Display for CatConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (reservation {})", self.animal_name, self.reservation_code)
    }
}

/// The main error type for the catlodge engine.
///
/// Variants are grouped by recovery policy: validation errors are
/// caller-fixable, not-found and conflict errors are surfaced without retry,
/// allocation failures indicate insufficient supply, and invariant
/// violations are bug-class and must never be swallowed.
#[derive(Debug, Error)]
pub enum Error {
    /// No accommodation category was supplied with the request.
    #[error("an accommodation category is required")]
    RoomTypeRequired,

    /// The requested date range is empty or inverted.
    #[error("invalid date range: check-out {check_out} must be after check-in {check_in}")]
    InvalidDateRange {
        /// Requested check-in date.
        check_in: NaiveDate,
        /// Requested check-out date.
        check_out: NaiveDate,
    },

    /// The requested check-in date lies in the past.
    #[error("check-in {check_in} is in the past (today is {today})")]
    CheckInInPast {
        /// Requested check-in date.
        check_in: NaiveDate,
        /// The reference date the request was validated against.
        today: NaiveDate,
    },

    /// A booking must include at least one cat.
    #[error("at least one cat is required")]
    MinCatsRequired,

    /// The party composition is invalid (e.g. the same cat listed twice).
    #[error("invalid party: {reason}")]
    PartySizeInvalid {
        /// Why the party is invalid.
        reason: String,
    },

    /// A field-level validation failure.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The accommodation category does not exist.
    #[error("accommodation category {category} not found")]
    RoomTypeNotFound {
        /// The unknown category id.
        category: CategoryId,
    },

    /// One or more of the requested cats do not exist.
    #[error("unknown cats: {missing:?}")]
    CatsNotFound {
        /// Ids that could not be resolved.
        missing: Vec<AnimalId>,
    },

    /// The physical unit does not exist.
    #[error("room {unit} not found")]
    RoomNotFound {
        /// The unknown unit id.
        unit: UnitId,
    },

    /// The reservation does not exist.
    #[error("reservation {code} not found")]
    ReservationNotFound {
        /// The unknown reservation code.
        code: String,
    },

    /// A requested add-on service does not exist or is inactive.
    #[error("boarding service {service} not found")]
    ServiceNotFound {
        /// The unknown service id.
        service: ServiceId,
    },

    /// One or more cats already have an overlapping reservation.
    #[error("scheduling conflict for {}", format_conflicts(conflicts))]
    CatConflicts {
        /// The offending cats with their conflicting reservation codes.
        conflicts: Vec<CatConflict>,
    },

    /// The accommodation category is not active for booking.
    #[error("accommodation category {category} is not available")]
    RoomTypeNotAvailable {
        /// The inactive category.
        category: CategoryId,
    },

    /// Every unit of the category is fully occupied for the requested dates.
    #[error("category {category} is fully booked between {check_in} and {check_out}")]
    RoomTypeUnavailableDates {
        /// The requested category.
        category: CategoryId,
        /// Requested check-in date.
        check_in: NaiveDate,
        /// Requested check-out date.
        check_out: NaiveDate,
    },

    /// A unit's capacity would be exceeded by a write that lost a race.
    #[error("room {unit} no longer has capacity for this party")]
    RoomCapacityExceeded {
        /// The contested unit.
        unit: UnitId,
    },

    /// No single unit has enough residual capacity for this party.
    #[error("no room in category {category} can take a party of {party_size} for these dates")]
    NoRoomAvailable {
        /// The requested category.
        category: CategoryId,
        /// The size of the requested party.
        party_size: u32,
    },

    /// The party is larger than any unit of the category could ever hold.
    #[error("party of {party_size} exceeds the largest room capacity of {max_unit_capacity}")]
    PartyExceedsCapacity {
        /// The size of the requested party.
        party_size: u32,
        /// The largest unit capacity in the category.
        max_unit_capacity: u32,
    },

    /// The category has no active units at all.
    #[error("accommodation category {category} has no active rooms")]
    NoActiveRooms {
        /// The category without active units.
        category: CategoryId,
    },

    /// The caller is not permitted to perform this transition.
    #[error("not permitted: {action}")]
    UpdateForbidden {
        /// The attempted action.
        action: String,
    },

    /// The caller is not permitted to view this reservation.
    #[error("not permitted to view: {resource}")]
    ForbiddenView {
        /// The resource that may not be viewed.
        resource: String,
    },

    /// A customer id is required for this booking channel.
    #[error("a customer id is required")]
    CustomerIdRequired,

    /// The requested status transition is not part of the lifecycle.
    #[error("reservation {code} cannot move from {from} to {to}")]
    InvalidTransition {
        /// The reservation being transitioned.
        code: String,
        /// Its current status.
        from: ReservationStatus,
        /// The requested status.
        to: ReservationStatus,
    },

    /// The operation was cancelled before entering its critical section.
    #[error("operation cancelled")]
    Cancelled,

    /// An optimistic pricing-configuration update raced a concurrent writer.
    #[error("pricing configuration version conflict: expected {expected}, found {found}")]
    VersionConflict {
        /// The version the caller based its update on.
        expected: u64,
        /// The version actually stored.
        found: u64,
    },

    /// A store lock could not be acquired in time.
    #[error("store lock timeout after {seconds}s")]
    LockTimeout {
        /// The number of seconds waited before timing out.
        seconds: u64,
    },

    /// A unit's nightly occupancy exceeds its capacity. Bug-class: this
    /// must abort loudly, never be clamped.
    #[error("capacity invariant violated for room {unit} on {night}: {details}")]
    CapacityInvariantViolation {
        /// The over-committed unit.
        unit: UnitId,
        /// The night on which the invariant broke.
        night: NaiveDate,
        /// Diagnostic details.
        details: String,
    },

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// An unsupported store schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: u32,
        /// The schema version found in the store.
        found: u32,
    },

    /// A store error occurred.
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// An engine configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A serialization error occurred (pricing payloads).
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_conflicts(conflicts: &[CatConflict]) -> String {
    conflicts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Returns the stable machine-readable code for user-facing failures.
    ///
    /// Infrastructure errors (store, I/O, invariant violations) have no
    /// platform code and return `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use catlodge::Error;
    ///
    /// assert_eq!(Error::MinCatsRequired.code(), Some("MIN_CATS_REQUIRED"));
    /// assert_eq!(Error::Cancelled.code(), None);
    /// ```
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::RoomTypeRequired => Some("ROOM_TYPE_REQUIRED"),
            Self::InvalidDateRange { .. } => Some("INVALID_DATE_RANGE"),
            Self::CheckInInPast { .. } => Some("CHECKIN_IN_PAST"),
            Self::MinCatsRequired => Some("MIN_CATS_REQUIRED"),
            Self::PartySizeInvalid { .. } => Some("PARTY_SIZE_INVALID"),
            Self::RoomTypeNotFound { .. } => Some("ROOM_TYPE_NOT_FOUND"),
            Self::CatsNotFound { .. } => Some("CATS_NOT_FOUND"),
            Self::RoomNotFound { .. } => Some("ROOM_NOT_FOUND"),
            Self::ReservationNotFound { .. } => Some("RESERVATION_NOT_FOUND"),
            Self::ServiceNotFound { .. } => Some("SERVICE_NOT_FOUND"),
            Self::CatConflicts { .. } => Some("CAT_CONFLICT"),
            Self::RoomTypeNotAvailable { .. } => Some("ROOM_TYPE_NOT_AVAILABLE"),
            Self::RoomTypeUnavailableDates { .. } => Some("ROOM_TYPE_UNAVAILABLE_DATES"),
            Self::RoomCapacityExceeded { .. } => Some("ROOM_CAPACITY_EXCEEDED"),
            Self::NoRoomAvailable { .. } => Some("ROOM_ASSIGNMENT_NO_ROOM"),
            Self::PartyExceedsCapacity { .. } => Some("ROOM_ASSIGNMENT_CAPACITY"),
            Self::NoActiveRooms { .. } => Some("ROOM_TYPE_NO_ACTIVE_ROOMS"),
            Self::UpdateForbidden { .. } => Some("UPDATE_FORBIDDEN"),
            Self::ForbiddenView { .. } => Some("FORBIDDEN_VIEW"),
            Self::CustomerIdRequired => Some("CUSTOMER_ID_REQUIRED"),
            Self::InvalidTransition { .. } => Some("INVALID_TRANSITION"),
            _ => None,
        }
    }

    /// Check if the error is a not-found condition.
    ///
    /// # Examples
    ///
    /// ```
    /// use catlodge::Error;
    ///
    /// let err = Error::ReservationNotFound { code: "CB-000001".into() };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RoomTypeNotFound { .. }
                | Self::CatsNotFound { .. }
                | Self::RoomNotFound { .. }
                | Self::ReservationNotFound { .. }
                | Self::ServiceNotFound { .. }
        )
    }

    /// Check if the error is a scheduling or supply failure that the caller
    /// can work around by changing dates, category, or party.
    #[must_use]
    pub fn is_scheduling_failure(&self) -> bool {
        matches!(
            self,
            Self::CatConflicts { .. }
                | Self::RoomTypeNotAvailable { .. }
                | Self::RoomTypeUnavailableDates { .. }
                | Self::RoomCapacityExceeded { .. }
                | Self::NoRoomAvailable { .. }
                | Self::PartyExceedsCapacity { .. }
                | Self::NoActiveRooms { .. }
        )
    }
}

impl From<crate::stay::InvalidStayError> for Error {
    fn from(err: crate::stay::InvalidStayError) -> Self {
        Self::InvalidDateRange {
            check_in: err.check_in,
            check_out: err.check_out,
        }
    }
}

impl From<crate::reservation::ValidationError> for Error {
    fn from(err: crate::reservation::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_invalid_date_range_display() {
        let err = Error::InvalidDateRange {
            check_in: date(2025, 3, 12),
            check_out: date(2025, 3, 10),
        };
        let display = format!("{err}");
        assert!(display.contains("2025-03-12"));
        assert!(display.contains("2025-03-10"));
        assert_eq!(err.code(), Some("INVALID_DATE_RANGE"));
    }

    #[test]
    fn test_cat_conflicts_display_uses_names() {
        let err = Error::CatConflicts {
            conflicts: vec![
                CatConflict {
                    animal_id: AnimalId::new(1),
                    animal_name: "Miso".into(),
                    reservation_code: "CB-000007".into(),
                },
                CatConflict {
                    animal_id: AnimalId::new(2),
                    animal_name: "Clementine".into(),
                    reservation_code: "CB-000008".into(),
                },
            ],
        };
        let display = format!("{err}");
        assert!(display.contains("Miso"));
        assert!(display.contains("Clementine"));
        assert!(display.contains("CB-000007"));
        assert_eq!(err.code(), Some("CAT_CONFLICT"));
    }

    #[test]
    fn test_allocation_failures_are_distinct() {
        let no_room = Error::NoRoomAvailable {
            category: CategoryId::new(1),
            party_size: 3,
        };
        let capacity = Error::PartyExceedsCapacity {
            party_size: 9,
            max_unit_capacity: 4,
        };
        assert_eq!(no_room.code(), Some("ROOM_ASSIGNMENT_NO_ROOM"));
        assert_eq!(capacity.code(), Some("ROOM_ASSIGNMENT_CAPACITY"));
    }

    #[test]
    fn test_not_found_predicate() {
        let err = Error::CatsNotFound {
            missing: vec![AnimalId::new(42)],
        };
        assert!(err.is_not_found());
        assert!(!err.is_scheduling_failure());
        assert_eq!(err.code(), Some("CATS_NOT_FOUND"));
    }

    #[test]
    fn test_scheduling_failure_predicate() {
        let err = Error::NoActiveRooms {
            category: CategoryId::new(5),
        };
        assert!(err.is_scheduling_failure());
        assert_eq!(err.code(), Some("ROOM_TYPE_NO_ACTIVE_ROOMS"));
    }

    #[test]
    fn test_infrastructure_errors_have_no_code() {
        let err = Error::CapacityInvariantViolation {
            unit: UnitId::new(3),
            night: date(2025, 6, 1),
            details: "occupancy 5 exceeds capacity 4".into(),
        };
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_version_conflict_display() {
        let err = Error::VersionConflict {
            expected: 3,
            found: 4,
        };
        let display = format!("{err}");
        assert!(display.contains("expected 3"));
        assert!(display.contains("found 4"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<u32> {
            Err(Error::MinCatsRequired)
        }

        assert!(returns_result().is_err());
    }
}
