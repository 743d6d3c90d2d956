//! Pricing and reservation-options engine for Rentflow
//!
//! Every booking surface (detail page, mobile sheet, checkout, listing
//! cards) prices a rental through this crate. The engine is pure and
//! synchronous; the `quote` and `address` services wire it to the async
//! collaborators defined in `rentflow_core::traits`.
//!
//! # Components
//!
//! - `geo` - haversine distance between coordinates
//! - `duration` - elapsed time to billable days or hours
//! - `discount` - single best duration discount tier
//! - `base_price` - rental price with discount applied
//! - `options_price` - add-on costs (insurance, second driver, delivery, flexible return)
//! - `reservation_options` - radius checks gating delivery and flexible return
//! - `quote` - listing fetch plus full price quote
//! - `address` - autocomplete suggestions annotated with reachability

pub mod address;
pub mod base_price;
pub mod discount;
pub mod duration;
pub mod geo;
pub mod options_price;
pub mod quote;
pub mod reservation_options;

pub use address::{AddressCandidate, AddressSelectionService};
pub use base_price::BasePriceCalculator;
pub use options_price::{OptionsBreakdown, OptionsPriceCalculator};
pub use quote::{Quote, QuoteService};

use rust_decimal::{Decimal, RoundingStrategy};

/// Engine constants
pub mod constants {
    /// Mean Earth radius used by the haversine formula
    pub const EARTH_RADIUS_KM: f64 = 6371.0;

    pub const MILLIS_PER_HOUR: i64 = 3_600_000;

    pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;
}

/// Round a money amount to `scale` decimal places, half away from zero
#[inline]
pub fn round_money(value: Decimal, scale: u32) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}
