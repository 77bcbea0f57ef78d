//! Stay range types for boarding date arithmetic.
//!
//! This module provides the validated half-open date interval used by
//! conflict detection and availability resolution. A stay covers the
//! nights `[check_in, check_out)`: the check-out date itself is not a
//! boarded night, so back-to-back stays never overlap.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A validated half-open boarding interval `[check_in, check_out)`.
///
/// Construction guarantees `check_out > check_in`, i.e. every stay covers
/// at least one night.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use catlodge::StayRange;
///
/// let check_in = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
/// let check_out = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
/// let stay = StayRange::new(check_in, check_out).unwrap();
///
/// assert_eq!(stay.nights(), 2);
///
/// // Zero-night and inverted ranges are rejected
/// assert!(StayRange::new(check_in, check_in).is_err());
/// assert!(StayRange::new(check_out, check_in).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StayRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayRange {
    /// Creates a new stay range.
    ///
    /// # Errors
    ///
    /// Returns an error if `check_out` is not strictly after `check_in`.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, InvalidStayError> {
        if check_out <= check_in {
            return Err(InvalidStayError {
                check_in,
                check_out,
            });
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Returns the check-in date.
    #[must_use]
    pub const fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    /// Returns the check-out date (exclusive).
    #[must_use]
    pub const fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Returns the number of boarded nights.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use catlodge::StayRange;
    ///
    /// let stay = StayRange::new(
    ///     NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2025, 7, 5).unwrap(),
    /// ).unwrap();
    /// assert_eq!(stay.nights(), 4);
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn nights(&self) -> u32 {
        // Construction guarantees check_out > check_in, so this is positive.
        (self.check_out - self.check_in).num_days() as u32
    }

    /// Tests half-open interval overlap with another stay.
    ///
    /// Two stays overlap iff `a.check_in < b.check_out && b.check_in <
    /// a.check_out`. Back-to-back stays (one checking out the day the other
    /// checks in) do NOT overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use catlodge::StayRange;
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
    /// let first = StayRange::new(d(10), d(12)).unwrap();
    /// let second = StayRange::new(d(12), d(14)).unwrap();
    /// let straddling = StayRange::new(d(11), d(13)).unwrap();
    ///
    /// assert!(!first.overlaps(&second));
    /// assert!(first.overlaps(&straddling));
    /// assert!(second.overlaps(&straddling));
    /// ```
    #[must_use]
    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    /// Returns `true` if the given date is a boarded night of this stay.
    ///
    /// The check-out date is not a boarded night.
    #[must_use]
    pub fn contains_night(&self, night: NaiveDate) -> bool {
        night >= self.check_in && night < self.check_out
    }

    /// Iterates over the boarded nights, check-in inclusive, check-out
    /// exclusive.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use catlodge::StayRange;
    ///
    /// let stay = StayRange::new(
    ///     NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
    ///     NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
    /// ).unwrap();
    /// let nights: Vec<_> = stay.iter_nights().collect();
    /// assert_eq!(nights.len(), 2);
    /// assert_eq!(nights[0], NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    /// ```
    pub fn iter_nights(&self) -> impl Iterator<Item = NaiveDate> {
        let check_out = self.check_out;
        self.check_in
            .iter_days()
            .take_while(move |night| *night < check_out)
    }
}

impl fmt::Display for StayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.check_in, self.check_out)
    }
}

/// Error type for invalid stay ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidStayError {
    /// The offending check-in date.
    pub check_in: NaiveDate,
    /// The offending check-out date.
    pub check_out: NaiveDate,
}

impl fmt::Display for InvalidStayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid stay range: check-out {} must be after check-in {}",
            self.check_out, self.check_in
        )
    }
}

impl std::error::Error for InvalidStayError {}
