//! Quote computation.
//!
//! Discounts compose sequentially: each enabled dimension takes its percent
//! off the *running* total, in the fixed order multi-cat, shared-room,
//! long-stay. Add-on lines are never discounted. Every applied discount is
//! retained in the itemized breakdown with its resolved tier so a later
//! admin view can explain exactly how a price came to be.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pricing::config::{DiscountPolicy, PricingConfig};
use crate::reservation::AddonLine;

/// The discount dimension that produced a breakdown entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountKind {
    /// Multi-cat discount, keyed by party size.
    MultiCat,
    /// Shared-room discount, keyed by residual unit capacity.
    SharedRoom,
    /// Long-stay discount, keyed by night count.
    LongStay,
}

impl std::fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MultiCat => write!(f, "multi-cat"),
            Self::SharedRoom => write!(f, "shared-room"),
            Self::LongStay => write!(f, "long-stay"),
        }
    }
}

/// One applied discount, kept for auditability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountApplied {
    /// Which dimension applied.
    pub kind: DiscountKind,
    /// The resolved tier threshold, absent for flat discounts.
    pub tier_key: Option<u32>,
    /// The percent taken off the running total.
    pub percent: Decimal,
    /// The concrete amount removed, rounded to the minor unit.
    pub amount_off: Decimal,
}

/// An itemized price quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// `nightly rate * nights`, before any discount.
    pub base: Decimal,
    /// Applied discounts in application order.
    pub discounts: Vec<DiscountApplied>,
    /// Sum of add-on lines; never discounted.
    pub addons_total: Decimal,
    /// Final amount due, clamped at zero.
    pub total: Decimal,
}

impl PriceBreakdown {
    /// Returns the total amount taken off by discounts.
    #[must_use]
    pub fn total_discount(&self) -> Decimal {
        self.discounts.iter().map(|d| d.amount_off).sum()
    }
}

/// Inputs for a quote, gathered by the booking planner.
#[derive(Debug, Clone)]
pub struct QuoteInputs<'a> {
    /// The category's nightly rate.
    pub nightly_rate: Decimal,
    /// Number of boarded nights.
    pub nights: u32,
    /// Number of cats in the party.
    pub animal_count: u32,
    /// Whether the party actually shares a unit with another party.
    pub sharing_applied: bool,
    /// The unit capacity left over after this party moves in. Only
    /// consulted when `sharing_applied` is set.
    pub remaining_capacity: u32,
    /// Priced add-on lines.
    pub addons: &'a [AddonLine],
}

/// Rounds an amount to the currency's minor unit, half-up.
fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Computes an itemized quote from resolved pricing policies.
///
/// # Errors
///
/// Returns [`Error::MinCatsRequired`] for an empty party and a validation
/// error for a zero-night stay; both are rejected upstream as well, this
/// keeps the function total on its own.
///
/// # Examples
///
/// ```
/// use catlodge::pricing::{quote, PricingConfig, QuoteInputs};
/// use rust_decimal::Decimal;
///
/// let inputs = QuoteInputs {
///     nightly_rate: Decimal::from(100),
///     nights: 4,
///     animal_count: 1,
///     sharing_applied: false,
///     remaining_capacity: 0,
///     addons: &[],
/// };
/// let breakdown = quote(&inputs, &PricingConfig::disabled(0)).unwrap();
/// assert_eq!(breakdown.total, Decimal::from(400));
/// ```
pub fn quote(inputs: &QuoteInputs<'_>, config: &PricingConfig) -> Result<PriceBreakdown> {
    if inputs.animal_count == 0 {
        return Err(Error::MinCatsRequired);
    }
    if inputs.nights == 0 {
        return Err(Error::Validation {
            field: "nights".into(),
            message: "a quote requires at least one night".into(),
        });
    }

    let base = round_currency(inputs.nightly_rate * Decimal::from(inputs.nights));
    let mut running = base;
    let mut discounts = Vec::new();

    let apply = |policy: &DiscountPolicy,
                     kind: DiscountKind,
                     observed: u32,
                     running: &mut Decimal,
                     discounts: &mut Vec<DiscountApplied>| {
        if let Some((tier_key, percent)) = policy.select(observed) {
            let amount_off = round_currency(*running * percent / Decimal::from(100));
            *running -= amount_off;
            discounts.push(DiscountApplied {
                kind,
                tier_key,
                percent,
                amount_off,
            });
        }
    };

    apply(
        &config.multi_cat,
        DiscountKind::MultiCat,
        inputs.animal_count,
        &mut running,
        &mut discounts,
    );

    if inputs.sharing_applied {
        apply(
            &config.shared_room,
            DiscountKind::SharedRoom,
            inputs.remaining_capacity,
            &mut running,
            &mut discounts,
        );
    }

    apply(
        &config.long_stay,
        DiscountKind::LongStay,
        inputs.nights,
        &mut running,
        &mut discounts,
    );

    let addons_total = round_currency(inputs.addons.iter().map(AddonLine::line_total).sum());

    let total = round_currency(running.max(Decimal::ZERO) + addons_total);

    log::debug!(
        "quoted {} nights x {} = {} base, {} discount(s), {} addons, {} total",
        inputs.nights,
        inputs.nightly_rate,
        base,
        discounts.len(),
        addons_total,
        total
    );

    Ok(PriceBreakdown {
        base,
        discounts,
        addons_total,
        total,
    })
}
