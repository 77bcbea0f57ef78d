//! Plan types for booking and lifecycle operations.
//!
//! A plan describes every write an operation will perform, without
//! performing any of it. Plans are built under the category lock, can be
//! inspected or logged, and are applied atomically by the executor.

use chrono::NaiveDate;

use crate::category::UnitId;
use crate::pricing::PriceBreakdown;
use crate::reservation::{ReservationCode, ReservationDraft, ReservationId, ReservationStatus};
use crate::stay::StayRange;

/// A single write to be performed during plan execution.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanAction {
    /// Persist a new reservation with its quoted price.
    CreateReservation {
        /// The validated draft.
        draft: ReservationDraft,
        /// The itemized quote; its total becomes the reservation total.
        breakdown: PriceBreakdown,
    },

    /// Bind the reservation created earlier in this plan to a unit.
    /// Capacity is re-checked inside the execution transaction.
    CreateAssignment {
        /// The chosen unit.
        unit_id: UnitId,
        /// Capacity the party consumes.
        animal_count: u32,
        /// The boarded interval, for the in-transaction capacity re-check.
        stay: StayRange,
    },

    /// Move a reservation to a new lifecycle status.
    TransitionStatus {
        /// The reservation.
        reservation_id: ReservationId,
        /// Its code, for plan descriptions.
        code: ReservationCode,
        /// The status the plan was built against.
        from: ReservationStatus,
        /// The target status.
        to: ReservationStatus,
    },

    /// Lock the reservation's unit assignment (check-in).
    LockAssignment {
        /// The reservation whose assignment is locked.
        reservation_id: ReservationId,
        /// Its code, for plan descriptions.
        code: ReservationCode,
    },
}

impl PlanAction {
    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::CreateReservation { draft, breakdown } => format!(
                "Create reservation for {} cat(s) in category {} ({}, total {})",
                draft.party_size(),
                draft.category_id,
                draft.stay,
                breakdown.total,
            ),
            Self::CreateAssignment {
                unit_id,
                animal_count,
                ..
            } => {
                format!("Assign {animal_count} cat(s) to unit {unit_id}")
            }
            Self::TransitionStatus { code, from, to, .. } => {
                format!("Move reservation {code} from {from} to {to}")
            }
            Self::LockAssignment { code, .. } => {
                format!("Lock unit assignment for reservation {code}")
            }
        }
    }
}

/// A complete operation plan describing all writes to be taken.
#[derive(Debug, Clone)]
pub struct OperationPlan {
    /// A human-readable description of the operation.
    pub description: String,

    /// The sequence of writes to perform.
    pub actions: Vec<PlanAction>,

    /// Warnings to communicate to the caller.
    pub warnings: Vec<String>,
}

impl OperationPlan {
    /// Creates a new operation plan with the given description.
    ///
    /// # Examples
    ///
    /// ```
    /// use catlodge::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Book 2 cats");
    /// assert!(plan.is_empty());
    /// ```
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an action to the plan.
    #[must_use]
    pub fn add_action(mut self, action: PlanAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a warning to the plan.
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Checks if the plan has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of actions in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns the quoted breakdown if this plan creates a reservation.
    #[must_use]
    pub fn quoted_breakdown(&self) -> Option<&PriceBreakdown> {
        self.actions.iter().find_map(|action| match action {
            PlanAction::CreateReservation { breakdown, .. } => Some(breakdown),
            _ => None,
        })
    }

    /// Returns the first booked night if this plan creates a reservation.
    #[must_use]
    pub fn first_night(&self) -> Option<NaiveDate> {
        self.actions.iter().find_map(|action| match action {
            PlanAction::CreateReservation { draft, .. } => Some(draft.stay.check_in()),
            _ => None,
        })
    }
}
