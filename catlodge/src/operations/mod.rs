//! The operations layer: planning, execution, and the engine facade.
//!
//! Operations follow a plan/execute split: planners validate a request
//! against store snapshots and emit an [`OperationPlan`] describing every
//! write; the [`PlanExecutor`] applies a plan inside one immediate
//! transaction. [`BookingEngine`] ties both together under the
//! category-scoped locking discipline.

pub mod booking;
pub mod engine;
pub mod executor;
pub mod lifecycle;
pub mod locks;
pub mod plan;

pub use booking::{AddonRequest, BookingChannel, BookingPlanner, BookingRequest};
pub use engine::BookingEngine;
pub use executor::{CreatedReservation, ExecutionResult, PlanExecutor};
pub use lifecycle::{plan_cancel, plan_check_in, plan_check_out, plan_confirm};
pub use locks::{CancelToken, CategoryLocks};
pub use plan::{OperationPlan, PlanAction};
