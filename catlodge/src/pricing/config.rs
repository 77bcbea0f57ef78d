//! Pricing configuration read model and policy resolution.
//!
//! The platform persists its pricing settings as a loosely-shaped payload
//! in which the legacy single-tier long-stay discount coexists with the
//! newer tier tables. This module owns that wire shape
//! ([`PricingConfigData`]), the tier normalization rules (ascending by
//! key, duplicate keys keep the last value seen), and the resolution into
//! an explicit [`DiscountPolicy`] per dimension. Resolution runs once when
//! a configuration snapshot is loaded; the quote path only ever sees
//! resolved policies.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One multi-cat discount tier: boarding `cat_count` or more cats earns
/// `discount_percent` off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiCatTier {
    /// Minimum number of cats for this tier to apply.
    pub cat_count: u32,
    /// Percent off the running total.
    pub discount_percent: Decimal,
}

/// One shared-room discount tier, keyed by the unit capacity left over
/// after the party moves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedRoomTier {
    /// Minimum remaining capacity for this tier to apply.
    pub remaining_capacity: u32,
    /// Percent off the running total.
    pub discount_percent: Decimal,
}

/// One long-stay discount tier: staying `min_nights` or more earns
/// `discount_percent` off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongStayTier {
    /// Minimum number of nights for this tier to apply.
    pub min_nights: u32,
    /// Percent off the running total.
    pub discount_percent: Decimal,
}

/// The legacy single-tier long-stay discount, retained for reading
/// historical configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyLongStayDiscount {
    /// Whether the legacy discount was switched on.
    pub enabled: bool,
    /// Minimum number of nights.
    pub min_nights: u32,
    /// Percent off the running total.
    pub discount_percent: Decimal,
}

/// The persisted pricing-configuration payload, exactly as the platform
/// stores it.
///
/// Every field defaults so that historical payloads missing the newer
/// tables still parse.
///
/// # Examples
///
/// ```
/// use catlodge::pricing::PricingConfigData;
///
/// let json = r#"{
///     "multiCatDiscountEnabled": true,
///     "multiCatDiscounts": [
///         {"catCount": 3, "discountPercent": 5},
///         {"catCount": 1, "discountPercent": 0}
///     ],
///     "sharedRoomDiscountEnabled": false,
///     "longStayDiscountEnabled": false
/// }"#;
/// let data: PricingConfigData = serde_json::from_str(json).unwrap();
/// assert_eq!(data.multi_cat_discounts.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfigData {
    /// Whether the multi-cat dimension is switched on.
    #[serde(default)]
    pub multi_cat_discount_enabled: bool,

    /// Multi-cat tiers, in whatever order the admin saved them.
    #[serde(default)]
    pub multi_cat_discounts: Vec<MultiCatTier>,

    /// Whether the shared-room dimension is switched on.
    #[serde(default)]
    pub shared_room_discount_enabled: bool,

    /// Flat shared-room percent, used only when no tier table is present.
    #[serde(default)]
    pub shared_room_discount_percent: Option<Decimal>,

    /// Shared-room tiers. When non-empty this table takes precedence over
    /// the flat percent.
    #[serde(default)]
    pub shared_room_discounts: Vec<SharedRoomTier>,

    /// Whether the long-stay dimension is switched on.
    #[serde(default)]
    pub long_stay_discount_enabled: bool,

    /// Long-stay tiers. When non-empty this table takes precedence over
    /// the legacy single tier.
    #[serde(default)]
    pub long_stay_discounts: Vec<LongStayTier>,

    /// The legacy single-tier long-stay discount, if the payload predates
    /// the tier table.
    #[serde(default)]
    pub long_stay_discount: Option<LegacyLongStayDiscount>,
}

impl PricingConfigData {
    /// Returns a normalized copy: every tier list sorted ascending by key,
    /// duplicate keys collapsed keeping the last value seen.
    ///
    /// Normalization is idempotent; the store applies it before persisting
    /// so a read-back always observes the canonical form.
    ///
    /// # Examples
    ///
    /// ```
    /// use catlodge::pricing::{MultiCatTier, PricingConfigData};
    /// use rust_decimal::Decimal;
    ///
    /// let tier = |count, pct| MultiCatTier {
    ///     cat_count: count,
    ///     discount_percent: Decimal::from(pct),
    /// };
    /// let data = PricingConfigData {
    ///     multi_cat_discounts: vec![tier(3, 5), tier(1, 0), tier(3, 7)],
    ///     ..Default::default()
    /// };
    /// let normalized = data.normalized();
    /// assert_eq!(normalized.multi_cat_discounts, vec![tier(1, 0), tier(3, 7)]);
    /// ```
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        out.multi_cat_discounts = normalize_pairs(
            self.multi_cat_discounts
                .iter()
                .map(|t| (t.cat_count, t.discount_percent)),
        )
        .into_iter()
        .map(|(cat_count, discount_percent)| MultiCatTier {
            cat_count,
            discount_percent,
        })
        .collect();

        out.shared_room_discounts = normalize_pairs(
            self.shared_room_discounts
                .iter()
                .map(|t| (t.remaining_capacity, t.discount_percent)),
        )
        .into_iter()
        .map(|(remaining_capacity, discount_percent)| SharedRoomTier {
            remaining_capacity,
            discount_percent,
        })
        .collect();

        out.long_stay_discounts = normalize_pairs(
            self.long_stay_discounts
                .iter()
                .map(|t| (t.min_nights, t.discount_percent)),
        )
        .into_iter()
        .map(|(min_nights, discount_percent)| LongStayTier {
            min_nights,
            discount_percent,
        })
        .collect();

        out
    }
}

/// Collapses duplicate keys (last write wins) and sorts ascending by key.
fn normalize_pairs(pairs: impl Iterator<Item = (u32, Decimal)>) -> Vec<(u32, Decimal)> {
    let mut map = BTreeMap::new();
    for (key, percent) in pairs {
        map.insert(key, percent);
    }
    map.into_iter().collect()
}

/// A resolved discount tier: the applicable tier is the one with the
/// highest threshold not exceeding the observed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    /// The tier threshold (cat count, remaining capacity, or nights).
    pub threshold: u32,
    /// Percent off the running total.
    pub percent: Decimal,
}

/// The resolved policy for one discount dimension.
///
/// The loose persisted shapes (enabled flags, optional flat percent, tier
/// tables, legacy single tier) collapse into this tagged form exactly once
/// at configuration-load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscountPolicy {
    /// The dimension is switched off.
    Disabled,
    /// A single flat percent, applied whenever the dimension triggers.
    Flat {
        /// Percent off the running total.
        percent: Decimal,
    },
    /// An ascending tier table; the highest tier not exceeding the
    /// observed value applies.
    Tiered {
        /// Tiers sorted ascending by threshold, unique thresholds.
        tiers: Vec<Tier>,
    },
    /// The legacy single-tier long-stay discount.
    Legacy {
        /// Minimum observed value (nights) for the discount to apply.
        min_nights: u32,
        /// Percent off the running total.
        percent: Decimal,
    },
}

impl DiscountPolicy {
    /// Selects the applicable `(tier key, percent)` for an observed value.
    ///
    /// Returns `None` when the dimension is disabled or no tier qualifies.
    /// Flat policies have no tier key.
    ///
    /// # Examples
    ///
    /// ```
    /// use catlodge::pricing::{DiscountPolicy, Tier};
    /// use rust_decimal::Decimal;
    ///
    /// let policy = DiscountPolicy::Tiered {
    ///     tiers: vec![
    ///         Tier { threshold: 1, percent: Decimal::ZERO },
    ///         Tier { threshold: 3, percent: Decimal::from(5) },
    ///         Tier { threshold: 5, percent: Decimal::from(10) },
    ///     ],
    /// };
    /// assert_eq!(policy.select(4), Some((Some(3), Decimal::from(5))));
    /// assert_eq!(policy.select(6), Some((Some(5), Decimal::from(10))));
    /// assert_eq!(policy.select(0), None);
    /// ```
    #[must_use]
    pub fn select(&self, observed: u32) -> Option<(Option<u32>, Decimal)> {
        match self {
            Self::Disabled => None,
            Self::Flat { percent } => Some((None, *percent)),
            Self::Tiered { tiers } => tiers
                .iter()
                .rev()
                .find(|tier| tier.threshold <= observed)
                .map(|tier| (Some(tier.threshold), tier.percent)),
            Self::Legacy { min_nights, percent } => {
                (observed >= *min_nights).then_some((Some(*min_nights), *percent))
            }
        }
    }

    /// Returns `true` unless the dimension is disabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

/// A fully resolved pricing-configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingConfig {
    /// Optimistic version stamp of the stored snapshot.
    pub version: u64,
    /// Multi-cat discount policy, keyed by party size.
    pub multi_cat: DiscountPolicy,
    /// Shared-room discount policy, keyed by residual unit capacity.
    pub shared_room: DiscountPolicy,
    /// Long-stay discount policy, keyed by night count.
    pub long_stay: DiscountPolicy,
}

impl PricingConfig {
    /// A snapshot with every dimension disabled. Used when no
    /// configuration has been stored yet.
    #[must_use]
    pub const fn disabled(version: u64) -> Self {
        Self {
            version,
            multi_cat: DiscountPolicy::Disabled,
            shared_room: DiscountPolicy::Disabled,
            long_stay: DiscountPolicy::Disabled,
        }
    }

    /// Resolves a raw payload into per-dimension policies.
    ///
    /// Tier tables are normalized first. Within the long-stay dimension a
    /// non-empty tier table beats the legacy single tier; the legacy tier
    /// only applies when its own enabled flag is set. A dimension whose
    /// enabled flag is off resolves to [`DiscountPolicy::Disabled`]
    /// regardless of what tables the payload carries.
    ///
    /// # Errors
    ///
    /// Returns a validation error if any percent lies outside `0..=100`.
    pub fn resolve(data: &PricingConfigData, version: u64) -> Result<Self> {
        let data = data.normalized();
        validate_percents(&data)?;

        let multi_cat = if data.multi_cat_discount_enabled && !data.multi_cat_discounts.is_empty()
        {
            DiscountPolicy::Tiered {
                tiers: data
                    .multi_cat_discounts
                    .iter()
                    .map(|t| Tier {
                        threshold: t.cat_count,
                        percent: t.discount_percent,
                    })
                    .collect(),
            }
        } else {
            DiscountPolicy::Disabled
        };

        let shared_room = if data.shared_room_discount_enabled {
            if data.shared_room_discounts.is_empty() {
                match data.shared_room_discount_percent {
                    Some(percent) => DiscountPolicy::Flat { percent },
                    None => DiscountPolicy::Disabled,
                }
            } else {
                DiscountPolicy::Tiered {
                    tiers: data
                        .shared_room_discounts
                        .iter()
                        .map(|t| Tier {
                            threshold: t.remaining_capacity,
                            percent: t.discount_percent,
                        })
                        .collect(),
                }
            }
        } else {
            DiscountPolicy::Disabled
        };

        let legacy_enabled = data.long_stay_discount.is_some_and(|legacy| legacy.enabled);
        let long_stay = if data.long_stay_discount_enabled || legacy_enabled {
            if data.long_stay_discounts.is_empty() {
                match data.long_stay_discount {
                    Some(legacy) if legacy.enabled => DiscountPolicy::Legacy {
                        min_nights: legacy.min_nights,
                        percent: legacy.discount_percent,
                    },
                    _ => DiscountPolicy::Disabled,
                }
            } else {
                DiscountPolicy::Tiered {
                    tiers: data
                        .long_stay_discounts
                        .iter()
                        .map(|t| Tier {
                            threshold: t.min_nights,
                            percent: t.discount_percent,
                        })
                        .collect(),
                }
            }
        } else {
            DiscountPolicy::Disabled
        };

        Ok(Self {
            version,
            multi_cat,
            shared_room,
            long_stay,
        })
    }
}

fn validate_percents(data: &PricingConfigData) -> Result<()> {
    let hundred = Decimal::from(100);
    let check = |percent: Decimal, field: &str| -> Result<()> {
        if percent < Decimal::ZERO || percent > hundred {
            return Err(Error::Validation {
                field: field.to_string(),
                message: format!("discount percent {percent} must lie within 0..=100"),
            });
        }
        Ok(())
    };

    for tier in &data.multi_cat_discounts {
        check(tier.discount_percent, "multiCatDiscounts")?;
    }
    for tier in &data.shared_room_discounts {
        check(tier.discount_percent, "sharedRoomDiscounts")?;
    }
    if let Some(percent) = data.shared_room_discount_percent {
        check(percent, "sharedRoomDiscountPercent")?;
    }
    for tier in &data.long_stay_discounts {
        check(tier.discount_percent, "longStayDiscounts")?;
    }
    if let Some(legacy) = data.long_stay_discount {
        check(legacy.discount_percent, "longStayDiscount")?;
    }
    Ok(())
}
