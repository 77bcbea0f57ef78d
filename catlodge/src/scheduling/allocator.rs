//! Unit allocation with best-fit packing.
//!
//! The allocator picks one unit from the resolver's candidate set. It
//! prefers the tightest sufficient fit so fragmentation concentrates in a
//! single unit instead of spreading thinly, and breaks ties by ascending
//! unit id so a fixed input always produces the same assignment. When the
//! request disallows sharing the allocator prefers an empty unit — a
//! preference, not a guarantee, because the surrounding platform promises
//! private-preference rather than private-guarantee.

use serde::{Deserialize, Serialize};

use crate::category::{CategoryId, UnitId};
use crate::error::{Error, Result};
use crate::scheduling::availability::UnitAvailability;

/// Policy knobs for the allocator.
///
/// The prefer-empty behavior is deliberately a knob rather than a fixed
/// law; deployments that want strict packing can switch it off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AllocationPolicy {
    /// When a party disallows sharing, prefer a unit with no current
    /// occupants if one qualifies.
    pub prefer_empty_when_private: bool,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            prefer_empty_when_private: true,
        }
    }
}

/// The allocator's choice for one booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationDecision {
    /// The chosen unit.
    pub unit_id: UnitId,
    /// Capacity left in the unit after this party moves in (on the
    /// tightest night).
    pub residual_capacity: u32,
    /// Whether the unit already hosts another party during the stay.
    pub shares_with_others: bool,
}

/// Chooses a unit for the party from the availability of all active units.
///
/// `availability` must cover every active unit (qualifying or not), as
/// produced by [`crate::scheduling::resolve_availability`]; the allocator
/// needs the full picture to distinguish its failure modes.
///
/// # Errors
///
/// - [`Error::PartyExceedsCapacity`] when the party is larger than any
///   unit of the category could ever hold, regardless of occupancy.
/// - [`Error::NoRoomAvailable`] when capacity exists but no single unit
///   can take this party for these dates.
///
/// # Examples
///
/// ```
/// use catlodge::scheduling::{assign, AllocationPolicy, UnitAvailability};
/// use catlodge::{CategoryId, UnitId};
///
/// let availability = vec![
///     UnitAvailability { unit_id: UnitId::new(1), capacity: 4, min_free_capacity: 4, occupied: false },
///     UnitAvailability { unit_id: UnitId::new(2), capacity: 4, min_free_capacity: 2, occupied: true },
/// ];
///
/// // Tightest fit wins: unit 2 has exactly the needed capacity left.
/// let decision = assign(
///     &availability,
///     2,
///     true,
///     &AllocationPolicy::default(),
///     CategoryId::new(1),
/// ).unwrap();
/// assert_eq!(decision.unit_id, UnitId::new(2));
/// assert_eq!(decision.residual_capacity, 0);
/// ```
pub fn assign(
    availability: &[UnitAvailability],
    party_size: u32,
    allow_sharing: bool,
    policy: &AllocationPolicy,
    category: CategoryId,
) -> Result<AllocationDecision> {
    let max_unit_capacity = availability.iter().map(|u| u.capacity).max().unwrap_or(0);
    if party_size > max_unit_capacity {
        return Err(Error::PartyExceedsCapacity {
            party_size,
            max_unit_capacity,
        });
    }

    let candidates: Vec<&UnitAvailability> = availability
        .iter()
        .filter(|u| u.min_free_capacity >= party_size)
        .collect();

    if candidates.is_empty() {
        return Err(Error::NoRoomAvailable {
            category,
            party_size,
        });
    }

    // Private-preference: when sharing is declined and an empty unit
    // qualifies, restrict the choice to empty units.
    let pool: Vec<&UnitAvailability> =
        if !allow_sharing && policy.prefer_empty_when_private {
            let empties: Vec<&UnitAvailability> = candidates
                .iter()
                .copied()
                .filter(|u| !u.occupied)
                .collect();
            if empties.is_empty() {
                candidates
            } else {
                empties
            }
        } else {
            candidates
        };

    // Best fit: smallest sufficient residual, then lowest unit id.
    let Some(chosen) = pool
        .into_iter()
        .min_by_key(|u| (u.min_free_capacity - party_size, u.unit_id))
    else {
        // The pool always falls back to the non-empty candidate set.
        unreachable!()
    };

    Ok(AllocationDecision {
        unit_id: chosen.unit_id,
        residual_capacity: chosen.min_free_capacity - party_size,
        shares_with_others: chosen.occupied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn avail(id: i64, capacity: u32, min_free: u32, occupied: bool) -> UnitAvailability {
        UnitAvailability {
            unit_id: UnitId::new(id),
            capacity,
            min_free_capacity: min_free,
            occupied,
        }
    }

    fn category() -> CategoryId {
        CategoryId::new(1)
    }

    #[test]
    fn test_tightest_fit_wins() {
        let availability = vec![avail(1, 6, 6, false), avail(2, 4, 3, true)];
        let decision = assign(&availability, 2, true, &AllocationPolicy::default(), category())
            .unwrap();
        assert_eq!(decision.unit_id, UnitId::new(2));
        assert_eq!(decision.residual_capacity, 1);
        assert!(decision.shares_with_others);
    }

    #[test]
    fn test_tie_broken_by_lower_unit_id() {
        let availability = vec![avail(5, 4, 3, false), avail(2, 4, 3, false)];
        let decision = assign(&availability, 2, true, &AllocationPolicy::default(), category())
            .unwrap();
        assert_eq!(decision.unit_id, UnitId::new(2));
    }

    #[test]
    fn test_determinism() {
        let availability = vec![
            avail(1, 4, 4, false),
            avail(2, 4, 4, false),
            avail(3, 4, 2, true),
        ];
        let first = assign(&availability, 2, true, &AllocationPolicy::default(), category())
            .unwrap();
        for _ in 0..5 {
            let again =
                assign(&availability, 2, true, &AllocationPolicy::default(), category()).unwrap();
            assert_eq!(again, first);
        }
    }

    #[test]
    fn test_private_prefers_empty_unit() {
        // Tightest fit would be the occupied unit 1, but the party declines
        // sharing and an empty unit qualifies.
        let availability = vec![avail(1, 4, 2, true), avail(2, 4, 4, false)];
        let decision = assign(&availability, 2, false, &AllocationPolicy::default(), category())
            .unwrap();
        assert_eq!(decision.unit_id, UnitId::new(2));
        assert!(!decision.shares_with_others);
    }

    #[test]
    fn test_private_falls_back_to_occupied_unit() {
        // Preference, not guarantee: with no empty unit the party still
        // lands in an occupied one.
        let availability = vec![avail(1, 4, 2, true)];
        let decision = assign(&availability, 2, false, &AllocationPolicy::default(), category())
            .unwrap();
        assert_eq!(decision.unit_id, UnitId::new(1));
        assert!(decision.shares_with_others);
    }

    #[test]
    fn test_prefer_empty_knob_off() {
        let availability = vec![avail(1, 4, 2, true), avail(2, 4, 4, false)];
        let policy = AllocationPolicy {
            prefer_empty_when_private: false,
        };
        let decision = assign(&availability, 2, false, &policy, category()).unwrap();
        // Pure best-fit: the occupied unit is the tighter fit.
        assert_eq!(decision.unit_id, UnitId::new(1));
    }

    #[test]
    fn test_no_room_vs_capacity_failures() {
        // Units could hold the party in principle, but are too full now.
        let availability = vec![avail(1, 4, 1, true), avail(2, 4, 0, true)];
        let err = assign(&availability, 3, true, &AllocationPolicy::default(), category())
            .unwrap_err();
        assert!(matches!(err, Error::NoRoomAvailable { .. }));

        // No unit could EVER hold the party: a different failure.
        let err = assign(&availability, 9, true, &AllocationPolicy::default(), category())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::PartyExceedsCapacity {
                party_size: 9,
                max_unit_capacity: 4
            }
        ));
    }

    #[test]
    fn test_empty_availability_is_capacity_failure() {
        let err = assign(&[], 1, true, &AllocationPolicy::default(), category()).unwrap_err();
        assert!(matches!(err, Error::PartyExceedsCapacity { .. }));
    }

    #[test]
    fn test_exact_fit() {
        let availability = vec![avail(1, 2, 2, false)];
        let decision = assign(&availability, 2, true, &AllocationPolicy::default(), category())
            .unwrap();
        assert_eq!(decision.residual_capacity, 0);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn availability_strategy() -> impl Strategy<Value = Vec<UnitAvailability>> {
            proptest::collection::vec(
                (1i64..50, 1u32..8, any::<bool>()).prop_map(|(id, capacity, occupied)| {
                    let min_free = if occupied { capacity / 2 } else { capacity };
                    avail(id, capacity, min_free, occupied)
                }),
                1..10,
            )
            .prop_map(|units| {
                // resolve_availability emits one entry per active unit, so
                // unit ids are unique in real input; enforce that invariant
                // here rather than exercising impossible duplicate-id slices.
                let mut seen = std::collections::HashSet::new();
                units
                    .into_iter()
                    .filter(|u| seen.insert(u.unit_id))
                    .collect()
            })
        }

        // PROPERTY: a successful allocation always fits the party
        proptest! {
            #[test]
            fn prop_allocation_fits(
                availability in availability_strategy(),
                party_size in 1u32..6,
                allow_sharing in any::<bool>(),
            ) {
                let result = assign(
                    &availability,
                    party_size,
                    allow_sharing,
                    &AllocationPolicy::default(),
                    CategoryId::new(1),
                );
                if let Ok(decision) = result {
                    let unit = availability
                        .iter()
                        .find(|u| u.unit_id == decision.unit_id)
                        .unwrap();
                    prop_assert!(unit.min_free_capacity >= party_size);
                    prop_assert_eq!(
                        decision.residual_capacity,
                        unit.min_free_capacity - party_size
                    );
                }
            }
        }

        // PROPERTY: allocation is deterministic
        proptest! {
            #[test]
            fn prop_allocation_deterministic(
                availability in availability_strategy(),
                party_size in 1u32..6,
            ) {
                let a = assign(
                    &availability, party_size, true,
                    &AllocationPolicy::default(), CategoryId::new(1),
                );
                let b = assign(
                    &availability, party_size, true,
                    &AllocationPolicy::default(), CategoryId::new(1),
                );
                match (a, b) {
                    (Ok(x), Ok(y)) => prop_assert_eq!(x, y),
                    (Err(_), Err(_)) => {}
                    _ => prop_assert!(false, "determinism violated"),
                }
            }
        }
    }
}
