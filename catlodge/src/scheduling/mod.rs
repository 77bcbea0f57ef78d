//! The pure scheduling core.
//!
//! Conflict detection, availability resolution, and unit allocation all
//! operate on plain in-memory snapshots ([`snapshot`]) loaded by the store
//! under the category lock. Nothing in this module performs I/O, which is
//! what makes the hard logic unit-testable without a database.

pub mod allocator;
pub mod availability;
pub mod conflict;
pub mod snapshot;

pub use allocator::{assign, AllocationDecision, AllocationPolicy};
pub use availability::{find_available_units, resolve_availability, UnitAvailability};
pub use conflict::find_conflicts;
pub use snapshot::{AnimalBookings, AssignmentWindow, BookingWindow, CategorySnapshot};
