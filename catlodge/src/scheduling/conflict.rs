//! Animal-level scheduling conflict detection.
//!
//! An animal cannot belong to two reservations whose date ranges overlap
//! unless one of them is cancelled. The scan is per-animal over a
//! pre-indexed snapshot, so its cost is `O(party x bookings-per-animal)`
//! rather than a full table walk.

use crate::error::CatConflict;
use crate::reservation::{AnimalId, ReservationId, ReservationStatus};
use crate::scheduling::snapshot::AnimalBookings;
use crate::stay::StayRange;

/// Finds every overlap between the requested stay and the animals'
/// existing non-cancelled reservations.
///
/// `exclude` skips one reservation id, used when re-validating an existing
/// reservation against itself. The caller fails the whole request if the
/// returned list is non-empty; there is no partial booking.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use catlodge::scheduling::{find_conflicts, AnimalBookings, BookingWindow};
/// use catlodge::{AnimalId, ReservationCode, ReservationId, ReservationStatus, StayRange};
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
/// let mut bookings = AnimalBookings::new();
/// bookings.register(AnimalId::new(1), "Miso");
/// bookings.add_booking(AnimalId::new(1), BookingWindow {
///     reservation_id: ReservationId::new(7),
///     code: ReservationCode::from_id(ReservationId::new(7)),
///     stay: StayRange::new(d(10), d(12)).unwrap(),
///     status: ReservationStatus::Confirmed,
/// });
///
/// // Back-to-back is allowed: half-open ranges do not overlap.
/// let stay = StayRange::new(d(12), d(14)).unwrap();
/// assert!(find_conflicts(&bookings, &[AnimalId::new(1)], &stay, None).is_empty());
///
/// let overlapping = StayRange::new(d(11), d(13)).unwrap();
/// let conflicts = find_conflicts(&bookings, &[AnimalId::new(1)], &overlapping, None);
/// assert_eq!(conflicts.len(), 1);
/// assert_eq!(conflicts[0].animal_name, "Miso");
/// ```
#[must_use]
pub fn find_conflicts(
    bookings: &AnimalBookings,
    animal_ids: &[AnimalId],
    stay: &StayRange,
    exclude: Option<ReservationId>,
) -> Vec<CatConflict> {
    let mut conflicts = Vec::new();

    for &animal_id in animal_ids {
        for window in bookings.bookings_of(animal_id) {
            if window.status == ReservationStatus::Cancelled {
                continue;
            }
            if Some(window.reservation_id) == exclude {
                continue;
            }
            if stay.overlaps(&window.stay) {
                conflicts.push(CatConflict {
                    animal_id,
                    animal_name: bookings
                        .name_of(animal_id)
                        .unwrap_or_default()
                        .to_string(),
                    reservation_code: window.code.to_string(),
                });
            }
        }
    }

    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservation::ReservationCode;
    use crate::scheduling::snapshot::BookingWindow;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn stay(check_in: u32, check_out: u32) -> StayRange {
        StayRange::new(d(check_in), d(check_out)).unwrap()
    }

    fn window(id: i64, check_in: u32, check_out: u32, status: ReservationStatus) -> BookingWindow {
        BookingWindow {
            reservation_id: ReservationId::new(id),
            code: ReservationCode::from_id(ReservationId::new(id)),
            stay: stay(check_in, check_out),
            status,
        }
    }

    fn index_with(windows: Vec<(i64, BookingWindow)>) -> AnimalBookings {
        let mut bookings = AnimalBookings::new();
        for (animal, window) in windows {
            let id = AnimalId::new(animal);
            if !bookings.contains(id) {
                bookings.register(id, format!("cat-{animal}"));
            }
            bookings.add_booking(id, window);
        }
        bookings
    }

    #[test]
    fn test_no_bookings_no_conflicts() {
        let mut bookings = AnimalBookings::new();
        bookings.register(AnimalId::new(1), "Miso");
        let conflicts = find_conflicts(&bookings, &[AnimalId::new(1)], &stay(10, 12), None);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_overlap_reported_with_name_and_code() {
        let bookings = index_with(vec![(1, window(7, 10, 12, ReservationStatus::Confirmed))]);
        let conflicts = find_conflicts(&bookings, &[AnimalId::new(1)], &stay(11, 13), None);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].animal_id, AnimalId::new(1));
        assert_eq!(conflicts[0].animal_name, "cat-1");
        assert_eq!(conflicts[0].reservation_code, "CB-000007");
    }

    #[test]
    fn test_back_to_back_allowed() {
        let bookings = index_with(vec![(1, window(7, 10, 12, ReservationStatus::Confirmed))]);
        assert!(find_conflicts(&bookings, &[AnimalId::new(1)], &stay(12, 14), None).is_empty());
        assert!(find_conflicts(&bookings, &[AnimalId::new(1)], &stay(8, 10), None).is_empty());
    }

    #[test]
    fn test_cancelled_reservations_ignored() {
        let bookings = index_with(vec![(1, window(7, 10, 12, ReservationStatus::Cancelled))]);
        assert!(find_conflicts(&bookings, &[AnimalId::new(1)], &stay(10, 12), None).is_empty());
    }

    #[test]
    fn test_checked_out_still_conflicts() {
        // Only cancellation frees the animal; a checked-out record still
        // occupies its dates for the animal (though not for the room).
        let bookings = index_with(vec![(1, window(7, 10, 12, ReservationStatus::CheckedOut))]);
        let conflicts = find_conflicts(&bookings, &[AnimalId::new(1)], &stay(11, 13), None);
        assert_eq!(conflicts.len(), 1);
    }

    #[test]
    fn test_exclude_skips_own_reservation() {
        let bookings = index_with(vec![(1, window(7, 10, 12, ReservationStatus::Confirmed))]);
        let conflicts = find_conflicts(
            &bookings,
            &[AnimalId::new(1)],
            &stay(10, 12),
            Some(ReservationId::new(7)),
        );
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_multiple_animals_aggregate() {
        let bookings = index_with(vec![
            (1, window(7, 10, 12, ReservationStatus::Confirmed)),
            (2, window(8, 11, 15, ReservationStatus::Pending)),
            (3, window(9, 20, 22, ReservationStatus::Confirmed)),
        ]);
        let conflicts = find_conflicts(
            &bookings,
            &[AnimalId::new(1), AnimalId::new(2), AnimalId::new(3)],
            &stay(11, 13),
            None,
        );
        assert_eq!(conflicts.len(), 2);
        let names: Vec<_> = conflicts.iter().map(|c| c.animal_name.as_str()).collect();
        assert!(names.contains(&"cat-1"));
        assert!(names.contains(&"cat-2"));
    }

    #[test]
    fn test_one_animal_many_windows() {
        let bookings = index_with(vec![
            (1, window(7, 1, 5, ReservationStatus::CheckedOut)),
            (1, window(8, 10, 12, ReservationStatus::Confirmed)),
            (1, window(9, 20, 25, ReservationStatus::Pending)),
        ]);
        let conflicts = find_conflicts(&bookings, &[AnimalId::new(1)], &stay(11, 21), None);
        assert_eq!(conflicts.len(), 2);
    }
}
