//! Integration tests for the reservation lifecycle.
//!
//! Guest bookings move PENDING -> CONFIRMED -> CHECKED_IN -> CHECKED_OUT;
//! cancellation is reachable only before arrival. Capacity release on
//! check-out and cancellation must be immediately visible to subsequent
//! bookings.

mod common;

use common::{d, open_store, seed_catalog, staff_request, today};

use catlodge::operations::{BookingChannel, BookingEngine, BookingRequest};
use catlodge::scheduling::AllocationPolicy;
use catlodge::{CustomerId, Error, ReservationStatus};
use tempfile::tempdir;

fn engine() -> BookingEngine {
    BookingEngine::new(AllocationPolicy::default())
}

#[test]
fn test_guest_booking_full_lifecycle() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());
    let (category, cats) = seed_catalog(&mut store, &[4], 1);

    let request = BookingRequest::new(Some(category), d(2), d(6), cats.clone())
        .with_channel(BookingChannel::Guest)
        .with_customer(Some(CustomerId::new(7)));
    let result = engine().book(&mut store, &request, today(), None).unwrap();
    let code = result.reservation.unwrap().code;

    let status = |store: &catlodge::Store| {
        store
            .get_reservation_by_code(code.as_str())
            .unwrap()
            .unwrap()
            .status
    };
    assert_eq!(status(&store), ReservationStatus::Pending);

    // Guests cannot check in before staff confirmation.
    assert!(matches!(
        engine().check_in(&mut store, code.as_str()).unwrap_err(),
        Error::InvalidTransition { .. }
    ));

    // Confirmation is staff-only.
    assert!(matches!(
        engine().confirm(&mut store, code.as_str(), false).unwrap_err(),
        Error::UpdateForbidden { .. }
    ));
    engine().confirm(&mut store, code.as_str(), true).unwrap();
    assert_eq!(status(&store), ReservationStatus::Confirmed);

    engine().check_in(&mut store, code.as_str()).unwrap();
    assert_eq!(status(&store), ReservationStatus::CheckedIn);

    let reservation = store
        .get_reservation_by_code(code.as_str())
        .unwrap()
        .unwrap();
    let assignment = store.get_assignment(reservation.id).unwrap().unwrap();
    assert!(assignment.is_locked());

    engine().check_out(&mut store, code.as_str()).unwrap();
    assert_eq!(status(&store), ReservationStatus::CheckedOut);

    // The lock is permanent; check-out does not clear it.
    let assignment = store.get_assignment(reservation.id).unwrap().unwrap();
    assert!(assignment.is_locked());
}

#[test]
fn test_cancel_before_arrival_only() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());
    let (category, cats) = seed_catalog(&mut store, &[4], 2);

    // Staff booking starts CONFIRMED and can still be cancelled.
    let result = engine()
        .book(&mut store, &staff_request(category, 2, 6, &cats[..1]), today(), None)
        .unwrap();
    let code = result.reservation.unwrap().code;
    engine().cancel(&mut store, code.as_str()).unwrap();

    // A checked-in stay cannot be cancelled.
    let result = engine()
        .book(&mut store, &staff_request(category, 2, 6, &cats[1..2]), today(), None)
        .unwrap();
    let code = result.reservation.unwrap().code;
    engine().check_in(&mut store, code.as_str()).unwrap();
    assert!(matches!(
        engine().cancel(&mut store, code.as_str()).unwrap_err(),
        Error::InvalidTransition { .. }
    ));

    // Terminal states stay terminal.
    engine().check_out(&mut store, code.as_str()).unwrap();
    assert!(matches!(
        engine().cancel(&mut store, code.as_str()).unwrap_err(),
        Error::InvalidTransition { .. }
    ));
}

#[test]
fn test_cancellation_frees_capacity_immediately() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());
    let (category, cats) = seed_catalog(&mut store, &[2], 4);

    let result = engine()
        .book(&mut store, &staff_request(category, 2, 6, &cats[..2]), today(), None)
        .unwrap();
    let code = result.reservation.unwrap().code;

    // Unit is full for the window.
    let blocked = staff_request(category, 3, 5, &cats[2..4]);
    assert!(engine().book(&mut store, &blocked, today(), None).is_err());

    engine().cancel(&mut store, code.as_str()).unwrap();
    assert!(engine().book(&mut store, &blocked, today(), None).is_ok());
}

#[test]
fn test_check_out_frees_capacity_for_future_windows() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());
    let (category, cats) = seed_catalog(&mut store, &[2], 4);

    let result = engine()
        .book(&mut store, &staff_request(category, 2, 10, &cats[..2]), today(), None)
        .unwrap();
    let code = result.reservation.unwrap().code;
    engine().check_in(&mut store, code.as_str()).unwrap();

    // The long stay blocks an overlapping booking.
    let blocked = staff_request(category, 6, 8, &cats[2..4]);
    assert!(engine().book(&mut store, &blocked, today(), None).is_err());

    // Early check-out releases the vacated nights.
    engine().check_out(&mut store, code.as_str()).unwrap();
    assert!(engine().book(&mut store, &blocked, today(), None).is_ok());
}

#[test]
fn test_double_transitions_rejected() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());
    let (category, cats) = seed_catalog(&mut store, &[4], 1);

    let result = engine()
        .book(&mut store, &staff_request(category, 2, 6, &cats), today(), None)
        .unwrap();
    let code = result.reservation.unwrap().code;

    engine().check_in(&mut store, code.as_str()).unwrap();
    assert!(matches!(
        engine().check_in(&mut store, code.as_str()).unwrap_err(),
        Error::InvalidTransition { .. }
    ));

    engine().check_out(&mut store, code.as_str()).unwrap();
    assert!(matches!(
        engine().check_out(&mut store, code.as_str()).unwrap_err(),
        Error::InvalidTransition { .. }
    ));
}

#[test]
fn test_unknown_reservation_code() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());
    seed_catalog(&mut store, &[4], 1);

    assert!(matches!(
        engine().check_in(&mut store, "CB-424242").unwrap_err(),
        Error::ReservationNotFound { .. }
    ));
}
