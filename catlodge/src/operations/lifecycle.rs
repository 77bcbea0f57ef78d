//! Lifecycle transition planning.
//!
//! Confirm, check-in, check-out, and cancel are planned here and applied
//! by the executor. Capacity release on check-out and cancellation is a
//! consequence of the status transition itself: availability only counts
//! capacity-holding statuses, and the transition commits in the same
//! transaction as the rest of its plan, so the release is atomic and
//! immediately visible to concurrent allocation attempts.

use crate::error::{Error, Result};
use crate::reservation::{Reservation, ReservationStatus};
use crate::store::Store;

use super::plan::{OperationPlan, PlanAction};

fn load(store: &Store, code: &str) -> Result<Reservation> {
    store
        .get_reservation_by_code(code)?
        .ok_or_else(|| Error::ReservationNotFound {
            code: code.to_string(),
        })
}

fn transition_action(reservation: &Reservation, to: ReservationStatus) -> Result<PlanAction> {
    if !reservation.status.can_transition_to(to) {
        return Err(Error::InvalidTransition {
            code: reservation.code.to_string(),
            from: reservation.status,
            to,
        });
    }
    Ok(PlanAction::TransitionStatus {
        reservation_id: reservation.id,
        code: reservation.code.clone(),
        from: reservation.status,
        to,
    })
}

/// Plans a staff confirmation of a pending reservation.
///
/// # Errors
///
/// Returns [`Error::UpdateForbidden`] for non-staff callers,
/// [`Error::ReservationNotFound`] for an unknown code, and
/// [`Error::InvalidTransition`] when the reservation is not PENDING.
pub fn plan_confirm(store: &Store, code: &str, staff: bool) -> Result<OperationPlan> {
    if !staff {
        return Err(Error::UpdateForbidden {
            action: "confirm a reservation".into(),
        });
    }
    let reservation = load(store, code)?;
    let action = transition_action(&reservation, ReservationStatus::Confirmed)?;
    Ok(OperationPlan::new(format!("Confirm reservation {code}")).add_action(action))
}

/// Plans a check-in: the status moves to CHECKED_IN and the unit
/// assignment is locked. From this point the reservation can never be
/// reassigned, even if a better-fitting unit frees up later.
///
/// # Errors
///
/// Returns [`Error::ReservationNotFound`] for an unknown code and
/// [`Error::InvalidTransition`] when the reservation is not CONFIRMED.
pub fn plan_check_in(store: &Store, code: &str) -> Result<OperationPlan> {
    let reservation = load(store, code)?;
    let action = transition_action(&reservation, ReservationStatus::CheckedIn)?;
    Ok(OperationPlan::new(format!("Check in reservation {code}"))
        .add_action(action)
        .add_action(PlanAction::LockAssignment {
            reservation_id: reservation.id,
            code: reservation.code,
        }))
}

/// Plans a check-out: the status moves to CHECKED_OUT and the unit's
/// capacity is released for the vacated nights.
///
/// # Errors
///
/// Returns [`Error::ReservationNotFound`] for an unknown code and
/// [`Error::InvalidTransition`] when the reservation is not CHECKED_IN.
pub fn plan_check_out(store: &Store, code: &str) -> Result<OperationPlan> {
    let reservation = load(store, code)?;
    let action = transition_action(&reservation, ReservationStatus::CheckedOut)?;
    Ok(OperationPlan::new(format!("Check out reservation {code}")).add_action(action))
}

/// Plans a cancellation. Only PENDING and CONFIRMED reservations can be
/// cancelled; once the party has arrived the stay must run to check-out.
///
/// # Errors
///
/// Returns [`Error::ReservationNotFound`] for an unknown code and
/// [`Error::InvalidTransition`] for checked-in, checked-out, or already
/// cancelled reservations.
pub fn plan_cancel(store: &Store, code: &str) -> Result<OperationPlan> {
    let reservation = load(store, code)?;
    let action = transition_action(&reservation, ReservationStatus::Cancelled)?;
    Ok(OperationPlan::new(format!("Cancel reservation {code}")).add_action(action))
}
