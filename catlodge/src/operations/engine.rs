//! The booking engine facade.
//!
//! [`BookingEngine`] is the thin adapter that wires the pure scheduling
//! and pricing core to the store under the category-lock discipline. It is
//! cheap to clone; every clone shares the same lock registry, so worker
//! threads each holding their own [`Store`] connection still serialize
//! their writes per accommodation category.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::category::CategoryId;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::pricing::PriceBreakdown;
use crate::scheduling::{find_available_units, AllocationPolicy, UnitAvailability};
use crate::stay::StayRange;
use crate::store::Store;

use super::booking::{BookingPlanner, BookingRequest};
use super::executor::{ExecutionResult, PlanExecutor};
use super::lifecycle::{plan_cancel, plan_check_in, plan_check_out, plan_confirm};
use super::locks::{CancelToken, CategoryLocks};

/// The reservation scheduling and pricing engine.
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use catlodge::operations::{BookingChannel, BookingEngine, BookingRequest};
/// use catlodge::scheduling::AllocationPolicy;
/// use catlodge::store::{Store, StoreConfig};
/// use catlodge::{AnimalId, CategoryId};
///
/// let engine = BookingEngine::new(AllocationPolicy::default());
/// let mut store = Store::open(StoreConfig::new("/tmp/catlodge.db")).unwrap();
///
/// let request = BookingRequest::new(
///     Some(CategoryId::new(1)),
///     NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 7, 5).unwrap(),
///     vec![AnimalId::new(1)],
/// )
/// .with_channel(BookingChannel::Staff);
///
/// let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// let result = engine.book(&mut store, &request, today, None).unwrap();
/// println!("booked {}", result.reservation.unwrap().code);
/// ```
#[derive(Debug, Clone)]
pub struct BookingEngine {
    policy: AllocationPolicy,
    locks: Arc<CategoryLocks>,
}

impl BookingEngine {
    /// Creates an engine with the given allocation policy.
    #[must_use]
    pub fn new(policy: AllocationPolicy) -> Self {
        Self {
            policy,
            locks: Arc::new(CategoryLocks::new()),
        }
    }

    /// Creates an engine from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.allocation_policy())
    }

    /// Books a stay: plans and executes the whole creation pipeline under
    /// the category lock, atomically.
    ///
    /// `cancel` is consulted once before the critical section is entered.
    ///
    /// # Errors
    ///
    /// Any creation-taxonomy error from planning, or a store error from
    /// execution. On error nothing has been written.
    pub fn book(
        &self,
        store: &mut Store,
        request: &BookingRequest,
        today: NaiveDate,
        cancel: Option<&CancelToken>,
    ) -> Result<ExecutionResult> {
        let category = request.category_id.ok_or(Error::RoomTypeRequired)?;
        self.locks.with(category, cancel, || {
            let plan = BookingPlanner::new(request, &self.policy).build_plan(store, today)?;
            PlanExecutor::new(store).execute(&plan)
        })
    }

    /// Prices a prospective stay without writing anything.
    ///
    /// Runs the same pipeline as [`Self::book`] (so the quote reflects the
    /// unit that would actually be chosen) but never touches the store.
    ///
    /// # Errors
    ///
    /// Same failures as [`Self::book`]'s planning phase.
    pub fn quote(
        &self,
        store: &Store,
        request: &BookingRequest,
        today: NaiveDate,
    ) -> Result<PriceBreakdown> {
        let plan = BookingPlanner::new(request, &self.policy).build_plan(store, today)?;
        plan.quoted_breakdown()
            .cloned()
            .ok_or_else(|| Error::Validation {
                field: "plan".into(),
                message: "booking plan carries no quote".into(),
            })
    }

    /// Computes which units of a category can take a party for a window.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RoomTypeNotFound`], [`Error::NoActiveRooms`], or a
    /// date validation error.
    pub fn availability(
        &self,
        store: &Store,
        category_id: CategoryId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        party_size: u32,
    ) -> Result<Vec<UnitAvailability>> {
        let stay = StayRange::new(check_in, check_out)?;
        let snapshot = store.load_category_snapshot(category_id, &stay)?;
        find_available_units(&snapshot, &stay, party_size)
    }

    /// Confirms a pending reservation (staff only).
    ///
    /// # Errors
    ///
    /// See [`plan_confirm`].
    pub fn confirm(&self, store: &mut Store, code: &str, staff: bool) -> Result<ExecutionResult> {
        self.run_lifecycle(store, code, |store| plan_confirm(store, code, staff))
    }

    /// Checks a reservation in, locking its unit assignment.
    ///
    /// # Errors
    ///
    /// See [`plan_check_in`].
    pub fn check_in(&self, store: &mut Store, code: &str) -> Result<ExecutionResult> {
        self.run_lifecycle(store, code, |store| plan_check_in(store, code))
    }

    /// Checks a reservation out, releasing its capacity.
    ///
    /// # Errors
    ///
    /// See [`plan_check_out`].
    pub fn check_out(&self, store: &mut Store, code: &str) -> Result<ExecutionResult> {
        self.run_lifecycle(store, code, |store| plan_check_out(store, code))
    }

    /// Cancels a reservation that has not yet checked in.
    ///
    /// # Errors
    ///
    /// See [`plan_cancel`].
    pub fn cancel(&self, store: &mut Store, code: &str) -> Result<ExecutionResult> {
        self.run_lifecycle(store, code, |store| plan_cancel(store, code))
    }

    /// Plans and executes a lifecycle transition under the category lock.
    ///
    /// The reservation is looked up first (read-only) to learn its
    /// category; the plan itself is rebuilt inside the critical section so
    /// it always sees the current status.
    fn run_lifecycle(
        &self,
        store: &mut Store,
        code: &str,
        plan_fn: impl Fn(&Store) -> Result<super::plan::OperationPlan>,
    ) -> Result<ExecutionResult> {
        let reservation = store
            .get_reservation_by_code(code)?
            .ok_or_else(|| Error::ReservationNotFound {
                code: code.to_string(),
            })?;

        self.locks.with(reservation.category_id, None, || {
            let plan = plan_fn(store)?;
            PlanExecutor::new(store).execute(&plan)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::BookingChannel;
    use crate::reservation::{AnimalId, ReservationStatus};
    use crate::store::test_util::create_test_store;
    use rust_decimal::Decimal;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    fn seeded_store() -> (Store, CategoryId, Vec<AnimalId>) {
        let mut store = create_test_store();
        let category = store
            .create_category("Suite", Decimal::from(100), 4)
            .unwrap();
        store.create_unit(category.id, None, 4).unwrap();
        let cats = (0..3)
            .map(|i| store.create_animal(&format!("cat-{i}"), None).unwrap().id)
            .collect();
        (store, category.id, cats)
    }

    fn request(category: CategoryId, cats: &[AnimalId]) -> BookingRequest {
        BookingRequest::new(Some(category), d(2), d(6), cats.to_vec())
            .with_channel(BookingChannel::Staff)
    }

    #[test]
    fn test_book_and_lifecycle_round_trip() {
        let (mut store, category, cats) = seeded_store();
        let engine = BookingEngine::new(AllocationPolicy::default());

        let result = engine
            .book(&mut store, &request(category, &cats[..1]), d(1), None)
            .unwrap();
        let code = result.reservation.unwrap().code;

        engine.check_in(&mut store, code.as_str()).unwrap();
        let loaded = store
            .get_reservation_by_code(code.as_str())
            .unwrap()
            .unwrap();
        assert_eq!(loaded.status, ReservationStatus::CheckedIn);
        assert!(store.get_assignment(loaded.id).unwrap().unwrap().is_locked());

        engine.check_out(&mut store, code.as_str()).unwrap();
        let loaded = store
            .get_reservation_by_code(code.as_str())
            .unwrap()
            .unwrap();
        assert_eq!(loaded.status, ReservationStatus::CheckedOut);
    }

    #[test]
    fn test_cancelled_token_blocks_booking() {
        let (mut store, category, cats) = seeded_store();
        let engine = BookingEngine::new(AllocationPolicy::default());
        let token = CancelToken::new();
        token.cancel();

        let result = engine.book(&mut store, &request(category, &cats[..1]), d(1), Some(&token));
        assert!(matches!(result.unwrap_err(), Error::Cancelled));
        assert!(store.list_reservations(None).unwrap().is_empty());
    }

    #[test]
    fn test_quote_writes_nothing() {
        let (store, category, cats) = seeded_store();
        let engine = BookingEngine::new(AllocationPolicy::default());

        let breakdown = engine
            .quote(&store, &request(category, &cats[..1]), d(1))
            .unwrap();
        assert_eq!(breakdown.total, Decimal::from(400));
        assert!(store.list_reservations(None).unwrap().is_empty());
    }

    #[test]
    fn test_availability_surface() {
        let (store, category, _) = seeded_store();
        let engine = BookingEngine::new(AllocationPolicy::default());
        let free = engine.availability(&store, category, d(2), d(6), 2).unwrap();
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].min_free_capacity, 4);
    }

    #[test]
    fn test_cancellation_releases_capacity() {
        let (mut store, category, cats) = seeded_store();
        let engine = BookingEngine::new(AllocationPolicy::default());

        // Fill the only unit.
        let result = engine
            .book(&mut store, &request(category, &cats), d(1), None)
            .unwrap();
        let code = result.reservation.unwrap().code;

        // A further party of 2 cannot fit anymore.
        let extra_a = store.create_animal("extra-1", None).unwrap().id;
        let extra_b = store.create_animal("extra-2", None).unwrap().id;
        let second = request(category, &[extra_a, extra_b]);
        assert!(engine.book(&mut store, &second, d(1), None).is_err());

        // After cancellation the capacity is back.
        engine.cancel(&mut store, code.as_str()).unwrap();
        assert!(engine.book(&mut store, &second, d(1), None).is_ok());
    }
}
