//! Booking request validation and plan building.
//!
//! The planner runs the whole creation pipeline — conflict detection,
//! availability resolution, unit allocation, add-on price snapshotting,
//! and quoting — against store snapshots, and emits a plan the executor
//! applies in one transaction. It performs no writes itself.

use chrono::NaiveDate;

use crate::category::CategoryId;
use crate::error::{Error, Result};
use crate::pricing::{quote, QuoteInputs};
use crate::reservation::{
    AddonLine, AnimalId, CustomerId, ReservationDraft, ReservationStatus, ServiceId,
};
use crate::scheduling::{assign, find_conflicts, resolve_availability, AllocationPolicy};
use crate::stay::StayRange;
use crate::store::Store;

use super::plan::{OperationPlan, PlanAction};

/// The channel a booking request arrives through.
///
/// Guest bookings start PENDING and must be confirmed by staff; staff
/// bookings start CONFIRMED directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingChannel {
    /// Self-service guest wizard.
    #[default]
    Guest,
    /// Front-desk staff.
    Staff,
}

impl BookingChannel {
    /// The initial reservation status for this channel.
    #[must_use]
    pub const fn initial_status(self) -> ReservationStatus {
        match self {
            Self::Guest => ReservationStatus::Pending,
            Self::Staff => ReservationStatus::Confirmed,
        }
    }
}

/// One requested add-on service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddonRequest {
    /// The service to add.
    pub service_id: ServiceId,
    /// How many times it is applied.
    pub quantity: u32,
}

/// A booking request as it crosses the engine boundary.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use catlodge::operations::{BookingChannel, BookingRequest};
/// use catlodge::{AnimalId, CategoryId};
///
/// let request = BookingRequest::new(
///     Some(CategoryId::new(1)),
///     NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 7, 5).unwrap(),
///     vec![AnimalId::new(1)],
/// )
/// .with_channel(BookingChannel::Staff)
/// .with_allow_sharing(false);
///
/// assert_eq!(request.channel, BookingChannel::Staff);
/// ```
#[derive(Debug, Clone)]
pub struct BookingRequest {
    /// The requested accommodation category.
    pub category_id: Option<CategoryId>,
    /// Requested check-in date.
    pub check_in: NaiveDate,
    /// Requested check-out date (exclusive).
    pub check_out: NaiveDate,
    /// The cats to board.
    pub animal_ids: Vec<AnimalId>,
    /// Whether the party may share a unit with other parties.
    pub allow_sharing: bool,
    /// The booking customer.
    pub customer_id: Option<CustomerId>,
    /// Requested add-on services.
    pub addons: Vec<AddonRequest>,
    /// Free-text notes for the operators.
    pub special_requests: Option<String>,
    /// The channel the request arrived through.
    pub channel: BookingChannel,
}

impl BookingRequest {
    /// Creates a request with defaults: sharing allowed, guest channel, no
    /// add-ons.
    #[must_use]
    pub fn new(
        category_id: Option<CategoryId>,
        check_in: NaiveDate,
        check_out: NaiveDate,
        animal_ids: Vec<AnimalId>,
    ) -> Self {
        Self {
            category_id,
            check_in,
            check_out,
            animal_ids,
            allow_sharing: true,
            customer_id: None,
            addons: Vec::new(),
            special_requests: None,
            channel: BookingChannel::Guest,
        }
    }

    /// Sets whether the party may share a unit.
    #[must_use]
    pub const fn with_allow_sharing(mut self, allow: bool) -> Self {
        self.allow_sharing = allow;
        self
    }

    /// Sets the booking customer.
    #[must_use]
    pub const fn with_customer(mut self, customer_id: Option<CustomerId>) -> Self {
        self.customer_id = customer_id;
        self
    }

    /// Sets the requested add-ons.
    #[must_use]
    pub fn with_addons(mut self, addons: Vec<AddonRequest>) -> Self {
        self.addons = addons;
        self
    }

    /// Sets the free-text notes.
    #[must_use]
    pub fn with_special_requests(mut self, notes: Option<String>) -> Self {
        self.special_requests = notes;
        self
    }

    /// Sets the booking channel.
    #[must_use]
    pub const fn with_channel(mut self, channel: BookingChannel) -> Self {
        self.channel = channel;
        self
    }

    #[allow(clippy::cast_possible_truncation)]
    fn party_size(&self) -> u32 {
        self.animal_ids.len() as u32
    }
}

/// Builds booking plans from requests and store snapshots.
pub struct BookingPlanner<'a> {
    request: &'a BookingRequest,
    policy: &'a AllocationPolicy,
}

impl<'a> BookingPlanner<'a> {
    /// Creates a planner for one request.
    #[must_use]
    pub const fn new(request: &'a BookingRequest, policy: &'a AllocationPolicy) -> Self {
        Self { request, policy }
    }

    /// Validates the request and builds the creation plan.
    ///
    /// Runs, in order: request validation, animal resolution, conflict
    /// detection, availability resolution, allocation, add-on price
    /// snapshotting, and quoting. Any failure aborts the whole request;
    /// the store is never written here.
    ///
    /// `today` anchors the check-in-not-in-the-past rule so tests (and
    /// back-dated staff corrections) can pin it explicitly.
    ///
    /// # Errors
    ///
    /// Every code in the reservation error taxonomy that concerns
    /// creation: validation errors, `CATS_NOT_FOUND` /
    /// `ROOM_TYPE_NOT_FOUND`, `CAT_CONFLICT`, availability and allocation
    /// failures, and `CUSTOMER_ID_REQUIRED` for guest bookings without a
    /// customer.
    pub fn build_plan(&self, store: &Store, today: NaiveDate) -> Result<OperationPlan> {
        let request = self.request;

        // Step 1: request-level validation.
        let category_id = request.category_id.ok_or(Error::RoomTypeRequired)?;
        let stay = StayRange::new(request.check_in, request.check_out)?;
        if request.check_in < today {
            return Err(Error::CheckInInPast {
                check_in: request.check_in,
                today,
            });
        }
        if request.animal_ids.is_empty() {
            return Err(Error::MinCatsRequired);
        }
        let mut seen = std::collections::HashSet::new();
        for animal in &request.animal_ids {
            if !seen.insert(*animal) {
                return Err(Error::PartySizeInvalid {
                    reason: format!("cat {animal} is listed more than once"),
                });
            }
        }
        if request.channel == BookingChannel::Guest && request.customer_id.is_none() {
            return Err(Error::CustomerIdRequired);
        }

        // Step 2: resolve animals and reject early on conflicts.
        let bookings = store.load_animal_bookings(&request.animal_ids)?;
        let conflicts = find_conflicts(&bookings, &request.animal_ids, &stay, None);
        if !conflicts.is_empty() {
            return Err(Error::CatConflicts { conflicts });
        }

        // Step 3: category and availability.
        let snapshot = store.load_category_snapshot(category_id, &stay)?;
        if !snapshot.category.active {
            return Err(Error::RoomTypeNotAvailable {
                category: category_id,
            });
        }
        let availability = resolve_availability(&snapshot, &stay)?;

        // Step 4: allocate a unit.
        let party_size = request.party_size();
        let decision = assign(
            &availability,
            party_size,
            request.allow_sharing,
            self.policy,
            category_id,
        )
        .map_err(|err| match err {
            // Every unit is completely full for the window: that is a
            // conflict with existing reservations, not missing supply.
            Error::NoRoomAvailable { .. }
                if availability.iter().all(|u| u.min_free_capacity == 0) =>
            {
                Error::RoomTypeUnavailableDates {
                    category: category_id,
                    check_in: request.check_in,
                    check_out: request.check_out,
                }
            }
            other => other,
        })?;

        // Step 5: snapshot add-on prices.
        let mut addon_lines = Vec::with_capacity(request.addons.len());
        for addon in &request.addons {
            if addon.quantity == 0 {
                return Err(Error::Validation {
                    field: "addons".into(),
                    message: format!("service {} has zero quantity", addon.service_id),
                });
            }
            let service = store
                .get_service(addon.service_id)?
                .filter(|s| s.active)
                .ok_or(Error::ServiceNotFound {
                    service: addon.service_id,
                })?;
            addon_lines.push(AddonLine {
                service_id: service.id,
                quantity: addon.quantity,
                unit_price: service.price,
            });
        }

        // Step 6: quote.
        let pricing = store.load_pricing_config()?;
        let sharing_applied = request.allow_sharing && decision.shares_with_others;
        let breakdown = quote(
            &QuoteInputs {
                nightly_rate: snapshot.category.nightly_rate,
                nights: stay.nights(),
                animal_count: party_size,
                sharing_applied,
                remaining_capacity: decision.residual_capacity,
                addons: &addon_lines,
            },
            &pricing,
        )?;

        // Step 7: assemble the draft and plan.
        let draft = ReservationDraft::builder(category_id, stay)
            .animals(request.animal_ids.clone())
            .status(request.channel.initial_status())
            .customer(request.customer_id)
            .allow_sharing(request.allow_sharing)
            .addons(addon_lines)
            .special_requests(request.special_requests.clone())
            .build()?;

        log::info!(
            "planned booking: {} cat(s), category {}, unit {}, total {}",
            party_size,
            category_id,
            decision.unit_id,
            breakdown.total
        );

        let plan = OperationPlan::new(format!(
            "Book {party_size} cat(s) in category {category_id} for {stay}"
        ))
        .add_action(PlanAction::CreateReservation {
            draft,
            breakdown,
        })
        .add_action(PlanAction::CreateAssignment {
            unit_id: decision.unit_id,
            animal_count: party_size,
            stay,
        });

        Ok(plan)
    }
}
