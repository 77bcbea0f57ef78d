//! Pricing configuration and quote computation.
//!
//! The pricing side of the engine is split in two: [`config`] parses and
//! normalizes the persisted pricing-configuration payload into a resolved
//! [`config::DiscountPolicy`] per discount dimension, and [`engine`]
//! computes itemized quotes from those resolved policies. Resolution
//! happens once at load time; quote computation never re-interprets the
//! raw payload.

pub mod config;
pub mod engine;

pub use config::{
    DiscountPolicy, LegacyLongStayDiscount, LongStayTier, MultiCatTier, PricingConfig,
    PricingConfigData, SharedRoomTier, Tier,
};
pub use engine::{quote, DiscountApplied, DiscountKind, PriceBreakdown, QuoteInputs};
