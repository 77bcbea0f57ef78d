//! Reservation types for tracking boarding bookings.
//!
//! This module provides the reservation status state machine, the draft
//! builder used when planning a booking, and the persisted reservation
//! record, along with the id newtypes shared across the engine.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::category::CategoryId;
use crate::stay::StayRange;

/// Identifier of a persisted reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(i64);

impl ReservationId {
    /// Wraps a raw reservation id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying id.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a boarded animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimalId(i64);

impl AnimalId {
    /// Wraps a raw animal id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying id.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a customer account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(i64);

impl CustomerId {
    /// Wraps a raw customer id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying id.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a boarding add-on service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(i64);

impl ServiceId {
    /// Wraps a raw service id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying id.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-facing reservation code, derived from the reservation id.
///
/// # Examples
///
/// ```
/// use catlodge::{ReservationCode, ReservationId};
///
/// let code = ReservationCode::from_id(ReservationId::new(7));
/// assert_eq!(code.as_str(), "CB-000007");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationCode(String);

impl ReservationCode {
    /// Derives the code for a persisted reservation id.
    #[must_use]
    pub fn from_id(id: ReservationId) -> Self {
        Self(format!("CB-{:06}", id.value()))
    }

    /// Wraps an existing code string.
    #[must_use]
    pub fn from_string(code: String) -> Self {
        Self(code)
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReservationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a reservation.
///
/// The lifecycle is `PENDING -> CONFIRMED -> CHECKED_IN -> CHECKED_OUT`,
/// with `CANCELLED` reachable only from `PENDING` or `CONFIRMED`. Both
/// `CHECKED_OUT` and `CANCELLED` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    /// Created through the guest channel, awaiting staff confirmation.
    Pending,
    /// Confirmed by staff (or created by staff directly).
    Confirmed,
    /// The party has arrived; the unit assignment is locked.
    CheckedIn,
    /// The stay is over; capacity is released. Terminal.
    CheckedOut,
    /// Cancelled before arrival; capacity is released. Terminal.
    Cancelled,
}

impl ReservationStatus {
    /// Returns `true` if the requested transition is part of the lifecycle.
    ///
    /// # Examples
    ///
    /// ```
    /// use catlodge::ReservationStatus;
    ///
    /// assert!(ReservationStatus::Pending.can_transition_to(ReservationStatus::Confirmed));
    /// assert!(ReservationStatus::Confirmed.can_transition_to(ReservationStatus::CheckedIn));
    /// assert!(!ReservationStatus::CheckedIn.can_transition_to(ReservationStatus::Cancelled));
    /// assert!(!ReservationStatus::CheckedOut.can_transition_to(ReservationStatus::CheckedIn));
    /// ```
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending | Self::Confirmed, Self::Cancelled)
                | (Self::Confirmed, Self::CheckedIn)
                | (Self::CheckedIn, Self::CheckedOut)
        )
    }

    /// Returns `true` for terminal statuses.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::CheckedOut | Self::Cancelled)
    }

    /// Returns `true` if a reservation in this status still occupies its
    /// unit for the nights of its stay.
    ///
    /// Cancelled and checked-out reservations no longer consume capacity.
    #[must_use]
    pub const fn holds_capacity(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::CheckedIn)
    }

    /// Returns the canonical storage string for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::CheckedIn => "CHECKED_IN",
            Self::CheckedOut => "CHECKED_OUT",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Parses a status from its canonical storage string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a known status.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "CHECKED_IN" => Ok(Self::CheckedIn),
            "CHECKED_OUT" => Ok(Self::CheckedOut),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(ValidationError {
                field: "status".into(),
                message: format!("unknown reservation status '{other}'"),
            }),
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One priced add-on service line on a reservation.
///
/// The unit price is a snapshot taken at booking time; later price changes
/// to the service never reprice an existing reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonLine {
    /// The boarding service.
    pub service_id: ServiceId,
    /// Number of times the service is applied.
    pub quantity: u32,
    /// Per-unit price frozen at booking time.
    pub unit_price: Decimal,
}

impl AddonLine {
    /// Returns the line total (`unit_price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A reservation draft: everything known before persistence assigns an id.
///
/// Built via [`ReservationDraft::builder`], which validates the party and
/// trims free-text fields.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use catlodge::{AnimalId, CategoryId, ReservationDraft, ReservationStatus, StayRange};
///
/// let stay = StayRange::new(
///     NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 7, 5).unwrap(),
/// ).unwrap();
///
/// let draft = ReservationDraft::builder(CategoryId::new(1), stay)
///     .animals(vec![AnimalId::new(1), AnimalId::new(2)])
///     .status(ReservationStatus::Pending)
///     .build()
///     .unwrap();
///
/// assert_eq!(draft.party_size(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDraft {
    /// The requested accommodation category.
    pub category_id: CategoryId,
    /// The boarding interval.
    pub stay: StayRange,
    /// Initial status (depends on booking channel).
    pub status: ReservationStatus,
    /// Owning customer, when known.
    pub customer_id: Option<CustomerId>,
    /// Whether the party may share a unit with other parties.
    pub allow_sharing: bool,
    /// The boarded cats. Never empty, never contains duplicates.
    pub animal_ids: Vec<AnimalId>,
    /// Priced add-on lines.
    pub addons: Vec<AddonLine>,
    /// Free-text operator notes.
    pub special_requests: Option<String>,
}

impl ReservationDraft {
    /// Creates a new draft builder.
    #[must_use]
    pub fn builder(category_id: CategoryId, stay: StayRange) -> ReservationDraftBuilder {
        ReservationDraftBuilder {
            category_id,
            stay,
            status: ReservationStatus::Pending,
            customer_id: None,
            allow_sharing: true,
            animal_ids: Vec::new(),
            addons: Vec::new(),
            special_requests: None,
        }
    }

    /// Returns the number of cats in the party.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn party_size(&self) -> u32 {
        self.animal_ids.len() as u32
    }
}

/// Builder for [`ReservationDraft`].
#[derive(Debug)]
pub struct ReservationDraftBuilder {
    category_id: CategoryId,
    stay: StayRange,
    status: ReservationStatus,
    customer_id: Option<CustomerId>,
    allow_sharing: bool,
    animal_ids: Vec<AnimalId>,
    addons: Vec<AddonLine>,
    special_requests: Option<String>,
}

impl ReservationDraftBuilder {
    /// Sets the boarded cats.
    #[must_use]
    pub fn animals(mut self, animal_ids: Vec<AnimalId>) -> Self {
        self.animal_ids = animal_ids;
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn status(mut self, status: ReservationStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the owning customer.
    #[must_use]
    pub const fn customer(mut self, customer_id: Option<CustomerId>) -> Self {
        self.customer_id = customer_id;
        self
    }

    /// Sets whether the party may share a unit with other parties.
    #[must_use]
    pub const fn allow_sharing(mut self, allow: bool) -> Self {
        self.allow_sharing = allow;
        self
    }

    /// Sets the priced add-on lines.
    #[must_use]
    pub fn addons(mut self, addons: Vec<AddonLine>) -> Self {
        self.addons = addons;
        self
    }

    /// Sets the free-text notes. The text will be trimmed; an empty string
    /// becomes `None`.
    #[must_use]
    pub fn special_requests(mut self, notes: Option<String>) -> Self {
        self.special_requests = notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self
    }

    /// Builds the draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the party is empty or lists the same cat twice.
    pub fn build(self) -> Result<ReservationDraft, ValidationError> {
        if self.animal_ids.is_empty() {
            return Err(ValidationError {
                field: "animal_ids".into(),
                message: "at least one cat is required".into(),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for animal in &self.animal_ids {
            if !seen.insert(*animal) {
                return Err(ValidationError {
                    field: "animal_ids".into(),
                    message: format!("cat {animal} is listed more than once"),
                });
            }
        }

        Ok(ReservationDraft {
            category_id: self.category_id,
            stay: self.stay,
            status: self.status,
            customer_id: self.customer_id,
            allow_sharing: self.allow_sharing,
            animal_ids: self.animal_ids,
            addons: self.addons,
            special_requests: self.special_requests,
        })
    }
}

/// A persisted reservation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// The reservation id.
    pub id: ReservationId,
    /// The human-facing code.
    pub code: ReservationCode,
    /// The booked category.
    pub category_id: CategoryId,
    /// The boarding interval.
    pub stay: StayRange,
    /// Current lifecycle status.
    pub status: ReservationStatus,
    /// Owning customer, when known.
    pub customer_id: Option<CustomerId>,
    /// Whether the party may share a unit with other parties.
    pub allow_sharing: bool,
    /// The boarded cats.
    pub animal_ids: Vec<AnimalId>,
    /// Priced add-on lines.
    pub addons: Vec<AddonLine>,
    /// Free-text operator notes.
    pub special_requests: Option<String>,
    /// Quoted total at booking time.
    pub total: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// Returns the number of cats in the party.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn party_size(&self) -> u32 {
        self.animal_ids.len() as u32
    }
}

/// A boarded animal known to the facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    /// The animal id.
    pub id: AnimalId,
    /// Display name, used in conflict reports.
    pub name: String,
    /// Owning customer, when known.
    pub customer_id: Option<CustomerId>,
}

/// A bookable add-on service (grooming, medication, extra play time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardingService {
    /// The service id.
    pub id: ServiceId,
    /// Display name.
    pub name: String,
    /// Current per-unit price. Snapshotted onto reservations at booking.
    pub price: Decimal,
    /// Whether the service can be added to new bookings.
    pub active: bool,
}

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}
