//! Per-unit availability resolution.
//!
//! For every active unit of a category, the resolver computes the minimum
//! free capacity across every night of the requested stay: the unit's
//! static capacity minus the cats of every capacity-holding assignment
//! overlapping that night. A unit qualifies for a party when its minimum
//! free capacity covers the whole party on every night.

use crate::error::{Error, Result};
use crate::category::UnitId;
use crate::scheduling::snapshot::CategorySnapshot;
use crate::stay::StayRange;

/// Availability of one unit over a stay window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitAvailability {
    /// The unit.
    pub unit_id: UnitId,
    /// The unit's static capacity.
    pub capacity: u32,
    /// The minimum free capacity across every night of the window.
    pub min_free_capacity: u32,
    /// Whether any other party occupies the unit during the window.
    pub occupied: bool,
}

/// Computes availability for every active unit of the category.
///
/// Returned in ascending unit-id order for determinism. Cancelled and
/// checked-out reservations hold no capacity, so a cancellation is visible
/// to the very next resolution.
///
/// # Errors
///
/// - [`Error::NoActiveRooms`] if the category has no active units at all;
///   this is diagnostically different from "no unit qualifies".
/// - [`Error::CapacityInvariantViolation`] if a unit's occupancy already
///   exceeds its capacity on some night. This is bug-class and is never
///   clamped.
pub fn resolve_availability(
    snapshot: &CategorySnapshot,
    stay: &StayRange,
) -> Result<Vec<UnitAvailability>> {
    let mut units: Vec<_> = snapshot.active_units().collect();
    if units.is_empty() {
        return Err(Error::NoActiveRooms {
            category: snapshot.category.id,
        });
    }
    units.sort_by_key(|u| u.id);

    let mut availability = Vec::with_capacity(units.len());
    for unit in units {
        let overlapping: Vec<_> = snapshot
            .assignments
            .iter()
            .filter(|a| {
                a.unit_id == unit.id && a.status.holds_capacity() && a.stay.overlaps(stay)
            })
            .collect();

        let mut min_free = unit.capacity;
        if !overlapping.is_empty() {
            for night in stay.iter_nights() {
                let occupancy: u32 = overlapping
                    .iter()
                    .filter(|a| a.stay.contains_night(night))
                    .map(|a| a.animal_count)
                    .sum();
                if occupancy > unit.capacity {
                    return Err(Error::CapacityInvariantViolation {
                        unit: unit.id,
                        night,
                        details: format!(
                            "occupancy {occupancy} exceeds capacity {}",
                            unit.capacity
                        ),
                    });
                }
                min_free = min_free.min(unit.capacity - occupancy);
            }
        }

        availability.push(UnitAvailability {
            unit_id: unit.id,
            capacity: unit.capacity,
            min_free_capacity: min_free,
            occupied: !overlapping.is_empty(),
        });
    }

    Ok(availability)
}

/// The availability contract: units whose minimum free capacity covers the
/// party, ascending by unit id.
///
/// # Errors
///
/// Propagates [`resolve_availability`] errors.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use catlodge::scheduling::{find_available_units, CategorySnapshot};
/// use catlodge::{AccommodationCategory, CategoryId, StayRange, Unit, UnitId};
/// use rust_decimal::Decimal;
///
/// let snapshot = CategorySnapshot {
///     category: AccommodationCategory {
///         id: CategoryId::new(1),
///         name: "Suite".into(),
///         nightly_rate: Decimal::from(100),
///         unit_capacity: 4,
///         active: true,
///     },
///     units: vec![Unit {
///         id: UnitId::new(1),
///         category_id: CategoryId::new(1),
///         label: None,
///         capacity: 4,
///         active: true,
///     }],
///     assignments: vec![],
/// };
/// let stay = StayRange::new(
///     NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 6, 4).unwrap(),
/// ).unwrap();
///
/// let free = find_available_units(&snapshot, &stay, 2).unwrap();
/// assert_eq!(free.len(), 1);
/// assert_eq!(free[0].min_free_capacity, 4);
/// ```
pub fn find_available_units(
    snapshot: &CategorySnapshot,
    stay: &StayRange,
    party_size: u32,
) -> Result<Vec<UnitAvailability>> {
    Ok(resolve_availability(snapshot, stay)?
        .into_iter()
        .filter(|u| u.min_free_capacity >= party_size)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{AccommodationCategory, CategoryId, Unit};
    use crate::reservation::{ReservationId, ReservationStatus};
    use crate::scheduling::snapshot::AssignmentWindow;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn stay(check_in: u32, check_out: u32) -> StayRange {
        StayRange::new(
            NaiveDate::from_ymd_opt(2025, 6, check_in).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, check_out).unwrap(),
        )
        .unwrap()
    }

    fn unit(id: i64, capacity: u32, active: bool) -> Unit {
        Unit {
            id: UnitId::new(id),
            category_id: CategoryId::new(1),
            label: None,
            capacity,
            active,
        }
    }

    fn assignment(
        unit_id: i64,
        reservation_id: i64,
        animal_count: u32,
        window: StayRange,
        status: ReservationStatus,
    ) -> AssignmentWindow {
        AssignmentWindow {
            unit_id: UnitId::new(unit_id),
            reservation_id: ReservationId::new(reservation_id),
            animal_count,
            stay: window,
            status,
        }
    }

    fn snapshot(units: Vec<Unit>, assignments: Vec<AssignmentWindow>) -> CategorySnapshot {
        CategorySnapshot {
            category: AccommodationCategory {
                id: CategoryId::new(1),
                name: "Suite".into(),
                nightly_rate: Decimal::from(100),
                unit_capacity: 4,
                active: true,
            },
            units,
            assignments,
        }
    }

    #[test]
    fn test_empty_category_fails_fast() {
        let snap = snapshot(vec![], vec![]);
        let result = resolve_availability(&snap, &stay(1, 4));
        assert!(matches!(result.unwrap_err(), Error::NoActiveRooms { .. }));
    }

    #[test]
    fn test_inactive_units_do_not_count_as_active() {
        let snap = snapshot(vec![unit(1, 4, false)], vec![]);
        let result = resolve_availability(&snap, &stay(1, 4));
        assert!(matches!(result.unwrap_err(), Error::NoActiveRooms { .. }));
    }

    #[test]
    fn test_free_unit_reports_full_capacity() {
        let snap = snapshot(vec![unit(1, 4, true)], vec![]);
        let free = resolve_availability(&snap, &stay(1, 4)).unwrap();
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].min_free_capacity, 4);
        assert!(!free[0].occupied);
    }

    #[test]
    fn test_minimum_over_staggered_assignments() {
        // Two overlapping assignments that only stack on nights 2-3.
        let snap = snapshot(
            vec![unit(1, 4, true)],
            vec![
                assignment(1, 10, 2, stay(1, 4), ReservationStatus::Confirmed),
                assignment(1, 11, 1, stay(2, 6), ReservationStatus::Confirmed),
            ],
        );
        let free = resolve_availability(&snap, &stay(1, 6)).unwrap();
        // Night 2 and 3 carry 3 cats, so the minimum free is 1.
        assert_eq!(free[0].min_free_capacity, 1);
        assert!(free[0].occupied);
    }

    #[test]
    fn test_released_statuses_hold_no_capacity() {
        for status in [ReservationStatus::Cancelled, ReservationStatus::CheckedOut] {
            let snap = snapshot(
                vec![unit(1, 2, true)],
                vec![assignment(1, 10, 2, stay(1, 4), status)],
            );
            let free = resolve_availability(&snap, &stay(1, 4)).unwrap();
            assert_eq!(free[0].min_free_capacity, 2, "status {status} must release");
            assert!(!free[0].occupied);
        }
    }

    #[test]
    fn test_back_to_back_assignment_does_not_reduce() {
        let snap = snapshot(
            vec![unit(1, 2, true)],
            vec![assignment(1, 10, 2, stay(1, 4), ReservationStatus::Confirmed)],
        );
        let free = resolve_availability(&snap, &stay(4, 7)).unwrap();
        assert_eq!(free[0].min_free_capacity, 2);
        assert!(!free[0].occupied);
    }

    #[test]
    fn test_qualifying_filter() {
        let snap = snapshot(
            vec![unit(1, 4, true), unit(2, 2, true)],
            vec![assignment(1, 10, 3, stay(1, 4), ReservationStatus::CheckedIn)],
        );
        let free = find_available_units(&snap, &stay(1, 4), 2).unwrap();
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].unit_id, UnitId::new(2));
    }

    #[test]
    fn test_results_sorted_by_unit_id() {
        let snap = snapshot(vec![unit(3, 2, true), unit(1, 2, true), unit(2, 2, true)], vec![]);
        let free = resolve_availability(&snap, &stay(1, 3)).unwrap();
        let ids: Vec<_> = free.iter().map(|u| u.unit_id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_over_commitment_is_fatal_not_clamped() {
        let snap = snapshot(
            vec![unit(1, 2, true)],
            vec![
                assignment(1, 10, 2, stay(1, 4), ReservationStatus::Confirmed),
                assignment(1, 11, 1, stay(2, 5), ReservationStatus::Confirmed),
            ],
        );
        let result = resolve_availability(&snap, &stay(1, 5));
        assert!(matches!(
            result.unwrap_err(),
            Error::CapacityInvariantViolation { .. }
        ));
    }
}
