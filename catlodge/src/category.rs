//! Accommodation catalog types.
//!
//! An accommodation category is a bookable room *type* (e.g. "Suite") with
//! a nightly rate; each category owns a number of physical units, each with
//! its own capacity.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier of an accommodation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(i64);

impl CategoryId {
    /// Wraps a raw category id.
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

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a physical unit (one room instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(i64);

impl UnitId {
    /// Wraps a raw unit id.
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

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bookable accommodation category (room type).
///
/// # Examples
///
/// ```
/// use catlodge::{AccommodationCategory, CategoryId};
/// use rust_decimal::Decimal;
///
/// let suite = AccommodationCategory {
///     id: CategoryId::new(1),
///     name: "Suite".to_string(),
///     nightly_rate: Decimal::new(10000, 2), // 100.00
///     unit_capacity: 4,
///     active: true,
/// };
/// assert!(suite.active);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccommodationCategory {
    /// The category id.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Price per boarded night, before discounts.
    pub nightly_rate: Decimal,
    /// Default capacity for units of this category.
    pub unit_capacity: u32,
    /// Whether the category is bookable.
    pub active: bool,
}

/// One physical room instance belonging to a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// The unit id.
    pub id: UnitId,
    /// The owning category.
    pub category_id: CategoryId,
    /// Optional label for operators ("Room 3").
    pub label: Option<String>,
    /// Maximum number of cats the unit can hold concurrently.
    pub capacity: u32,
    /// Whether the unit is in service.
    pub active: bool,
}

impl Unit {
    /// Returns a display label, falling back to the id.
    #[must_use]
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("unit {}", self.id))
    }
}
