//! Plan execution engine.
//!
//! The executor applies a whole plan inside a single immediate
//! transaction: either every action commits or none does, so a failed
//! booking can never leave an orphaned reservation or tentative
//! assignment behind. Before inserting an assignment it re-checks the
//! unit's residual capacity inside the transaction, turning a lost race
//! into a clean `ROOM_CAPACITY_EXCEEDED` failure instead of a capacity
//! violation.

use chrono::Utc;
use rusqlite::TransactionBehavior;

use crate::category::UnitId;
use crate::error::{Error, Result};
use crate::pricing::PriceBreakdown;
use crate::reservation::{ReservationCode, ReservationId, ReservationStatus};
use crate::store::Store;

use super::plan::{OperationPlan, PlanAction};

/// The reservation a successful plan execution created.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedReservation {
    /// The assigned id.
    pub id: ReservationId,
    /// The derived human-facing code.
    pub code: ReservationCode,
    /// The initial lifecycle status (depends on booking channel).
    pub status: ReservationStatus,
    /// The unit the party was assigned to.
    pub unit_id: Option<UnitId>,
}

/// Result of executing a plan.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Whether execution succeeded.
    pub success: bool,

    /// Whether this was a dry run (no changes made).
    pub dry_run: bool,

    /// Descriptions of the actions taken (or that would be taken).
    pub actions_taken: Vec<String>,

    /// Warnings from the plan.
    pub warnings: Vec<String>,

    /// The created reservation, for plans that create one. `None` in dry
    /// runs and for pure lifecycle plans.
    pub reservation: Option<CreatedReservation>,

    /// The quoted breakdown, for plans that create a reservation. Present
    /// in dry runs too, so a quote can be shown without writing anything.
    pub breakdown: Option<PriceBreakdown>,
}

impl ExecutionResult {
    fn from_plan(
        plan: &OperationPlan,
        dry_run: bool,
        reservation: Option<CreatedReservation>,
    ) -> Self {
        Self {
            success: true,
            dry_run,
            actions_taken: plan.actions.iter().map(PlanAction::description).collect(),
            warnings: plan.warnings.clone(),
            reservation,
            breakdown: plan.quoted_breakdown().cloned(),
        }
    }
}

/// Executes operation plans against the store.
///
/// # Examples
///
/// ```no_run
/// use catlodge::operations::{OperationPlan, PlanExecutor};
/// use catlodge::store::{Store, StoreConfig};
///
/// let mut store = Store::open(StoreConfig::new("/tmp/catlodge.db")).unwrap();
/// let plan = OperationPlan::new("no-op");
///
/// let result = PlanExecutor::new(&mut store).execute(&plan).unwrap();
/// assert!(result.success);
///
/// let result = PlanExecutor::new(&mut store).dry_run().execute(&plan).unwrap();
/// assert!(result.dry_run);
/// ```
pub struct PlanExecutor<'a> {
    store: &'a mut Store,
    dry_run: bool,
}

impl<'a> PlanExecutor<'a> {
    /// Creates a new plan executor.
    #[must_use]
    pub fn new(store: &'a mut Store) -> Self {
        Self {
            store,
            dry_run: false,
        }
    }

    /// Switches the executor to dry-run mode: the plan is reported but no
    /// database change is made.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Executes the given plan.
    ///
    /// All actions run inside one immediate transaction. On any failure
    /// the transaction rolls back and the store is untouched.
    ///
    /// # Errors
    ///
    /// Returns the first action's error, [`Error::RoomCapacityExceeded`]
    /// when an assignment lost a capacity race, or a store error.
    pub fn execute(&mut self, plan: &OperationPlan) -> Result<ExecutionResult> {
        if self.dry_run {
            return Ok(ExecutionResult::from_plan(plan, true, None));
        }

        let tx = self
            .store
            .connection_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut created: Option<CreatedReservation> = None;
        for action in &plan.actions {
            match action {
                PlanAction::CreateReservation { draft, breakdown } => {
                    let (id, code) =
                        Store::insert_reservation_tx(&tx, draft, breakdown.total, Utc::now())?;
                    created = Some(CreatedReservation {
                        id,
                        code,
                        status: draft.status,
                        unit_id: None,
                    });
                }
                PlanAction::CreateAssignment {
                    unit_id,
                    animal_count,
                    stay,
                } => {
                    let Some(reservation) = created.as_mut() else {
                        return Err(Error::Validation {
                            field: "plan".into(),
                            message: "assignment action without a created reservation".into(),
                        });
                    };
                    // The plan was built from a snapshot; under external
                    // writers the capacity may have moved since.
                    let residual = Store::unit_residual_capacity_tx(&tx, *unit_id, stay)?;
                    if residual < *animal_count {
                        return Err(Error::RoomCapacityExceeded { unit: *unit_id });
                    }
                    Store::insert_assignment_tx(&tx, reservation.id, *unit_id, *animal_count)?;
                    reservation.unit_id = Some(*unit_id);
                }
                PlanAction::TransitionStatus {
                    reservation_id,
                    from,
                    to,
                    ..
                } => {
                    Store::transition_status_tx(&tx, *reservation_id, *from, *to)?;
                }
                PlanAction::LockAssignment { reservation_id, .. } => {
                    Store::lock_assignment_tx(&tx, *reservation_id, Utc::now())?;
                }
            }
        }

        tx.commit()?;

        log::debug!("executed plan: {}", plan.description);

        Ok(ExecutionResult::from_plan(plan, false, created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryId;
    use crate::reservation::{AnimalId, ReservationDraft, ReservationStatus};
    use crate::stay::StayRange;
    use crate::store::test_util::create_test_store;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn stay(check_in: u32, check_out: u32) -> StayRange {
        StayRange::new(
            NaiveDate::from_ymd_opt(2025, 7, check_in).unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, check_out).unwrap(),
        )
        .unwrap()
    }

    fn breakdown(total: i64) -> PriceBreakdown {
        PriceBreakdown {
            base: Decimal::from(total),
            discounts: vec![],
            addons_total: Decimal::ZERO,
            total: Decimal::from(total),
        }
    }

    struct Fixture {
        store: Store,
        category: CategoryId,
        unit: UnitId,
        cat: AnimalId,
    }

    fn fixture() -> Fixture {
        let mut store = create_test_store();
        let category = store
            .create_category("Suite", Decimal::from(100), 4)
            .unwrap();
        let unit = store.create_unit(category.id, None, 2).unwrap();
        let cat = store.create_animal("Miso", None).unwrap();
        Fixture {
            store,
            category: category.id,
            unit: unit.id,
            cat: cat.id,
        }
    }

    fn booking_plan(fixture: &Fixture, window: StayRange, animal_count: u32) -> OperationPlan {
        let draft = ReservationDraft::builder(fixture.category, window)
            .animals(vec![fixture.cat])
            .status(ReservationStatus::Confirmed)
            .build()
            .unwrap();
        OperationPlan::new("Book")
            .add_action(PlanAction::CreateReservation {
                draft,
                breakdown: breakdown(400),
            })
            .add_action(PlanAction::CreateAssignment {
                unit_id: fixture.unit,
                animal_count,
                stay: window,
            })
    }

    #[test]
    fn test_execute_booking_plan() {
        let mut fixture = fixture();
        let plan = booking_plan(&fixture, stay(1, 5), 1);

        let result = PlanExecutor::new(&mut fixture.store).execute(&plan).unwrap();
        assert!(result.success);
        let created = result.reservation.unwrap();
        assert_eq!(created.unit_id, Some(fixture.unit));

        let loaded = fixture.store.get_reservation(created.id).unwrap().unwrap();
        assert_eq!(loaded.total, Decimal::from(400));
        let assignment = fixture.store.get_assignment(created.id).unwrap().unwrap();
        assert!(!assignment.is_locked());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let mut fixture = fixture();
        let plan = booking_plan(&fixture, stay(1, 5), 1);

        let result = PlanExecutor::new(&mut fixture.store)
            .dry_run()
            .execute(&plan)
            .unwrap();
        assert!(result.dry_run);
        assert!(result.reservation.is_none());
        assert!(result.breakdown.is_some());

        assert!(fixture.store.list_reservations(None).unwrap().is_empty());
    }

    #[test]
    fn test_capacity_race_rolls_back_everything() {
        let mut fixture = fixture();

        // First booking fills the unit completely.
        let full = booking_plan(&fixture, stay(1, 5), 2);
        PlanExecutor::new(&mut fixture.store).execute(&full).unwrap();

        // A second plan built from a stale snapshot now loses the re-check.
        let stale = booking_plan(&fixture, stay(1, 5), 1);
        let result = PlanExecutor::new(&mut fixture.store).execute(&stale);
        assert!(matches!(
            result.unwrap_err(),
            Error::RoomCapacityExceeded { .. }
        ));

        // No partial write: the losing plan's reservation must not exist.
        assert_eq!(fixture.store.list_reservations(None).unwrap().len(), 1);
    }

    #[test]
    fn test_lifecycle_plan_execution() {
        let mut fixture = fixture();
        let plan = booking_plan(&fixture, stay(1, 5), 1);
        let created = PlanExecutor::new(&mut fixture.store)
            .execute(&plan)
            .unwrap()
            .reservation
            .unwrap();

        let check_in_plan = OperationPlan::new("Check in")
            .add_action(PlanAction::TransitionStatus {
                reservation_id: created.id,
                code: created.code.clone(),
                from: ReservationStatus::Confirmed,
                to: ReservationStatus::CheckedIn,
            })
            .add_action(PlanAction::LockAssignment {
                reservation_id: created.id,
                code: created.code.clone(),
            });

        PlanExecutor::new(&mut fixture.store)
            .execute(&check_in_plan)
            .unwrap();

        let loaded = fixture.store.get_reservation(created.id).unwrap().unwrap();
        assert_eq!(loaded.status, ReservationStatus::CheckedIn);
        let assignment = fixture.store.get_assignment(created.id).unwrap().unwrap();
        assert!(assignment.is_locked());
    }

    #[test]
    fn test_failed_transition_rolls_back_whole_plan() {
        let mut fixture = fixture();
        let plan = booking_plan(&fixture, stay(1, 5), 1);
        let created = PlanExecutor::new(&mut fixture.store)
            .execute(&plan)
            .unwrap()
            .reservation
            .unwrap();

        // Transition guard fails (reservation is Confirmed, not Pending),
        // so the lock action must not be applied either.
        let bad_plan = OperationPlan::new("Bad")
            .add_action(PlanAction::TransitionStatus {
                reservation_id: created.id,
                code: created.code.clone(),
                from: ReservationStatus::Pending,
                to: ReservationStatus::Confirmed,
            })
            .add_action(PlanAction::LockAssignment {
                reservation_id: created.id,
                code: created.code,
            });

        let result = PlanExecutor::new(&mut fixture.store).execute(&bad_plan);
        assert!(result.is_err());
        let assignment = fixture.store.get_assignment(created.id).unwrap().unwrap();
        assert!(!assignment.is_locked());
    }

    #[test]
    fn test_assignment_without_reservation_is_rejected() {
        let mut fixture = fixture();
        let plan = OperationPlan::new("Broken").add_action(PlanAction::CreateAssignment {
            unit_id: fixture.unit,
            animal_count: 1,
            stay: stay(1, 5),
        });

        let result = PlanExecutor::new(&mut fixture.store).execute(&plan);
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
    }
}
