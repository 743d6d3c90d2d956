//! Booking request and price breakdown models

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::listing::DiscountThreshold;
use crate::{PricingError, PricingResult};

/// Requested rental period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Create a range, rejecting `end <= start`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> PricingResult<Self> {
        let range = Self { start, end };
        range.ensure_positive()?;
        Ok(range)
    }

    /// Wall-clock time between start and end
    #[inline]
    pub fn elapsed(&self) -> TimeDelta {
        self.end - self.start
    }

    pub fn ensure_positive(&self) -> PricingResult<()> {
        if self.end <= self.start {
            return Err(PricingError::InvalidDateRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// Billable quantity of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillableUnits {
    /// Whole hours when `is_hourly`, whole days otherwise
    pub count: u32,
    pub is_hourly: bool,
}

/// The single discount tier that applied to a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedDiscount {
    pub percentage: u8,
    pub threshold: DiscountThreshold,
}

/// Days charged for per-day add-ons, at least one
#[inline]
pub fn billable_days(days: u32) -> u32 {
    days.max(1)
}

/// Result of pricing a date range against a listing tariff
///
/// Created fresh on every pricing request and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// Billed days, 0 for hourly bookings
    pub days: u32,

    /// Billed hours, 0 for daily bookings
    pub hours: u32,

    pub is_hourly: bool,

    /// Unit rate times unit count, before discount
    pub base_price: Decimal,

    /// Applied percentage, 0 when no tier qualified
    pub discount: u8,

    pub discount_threshold: Option<DiscountThreshold>,

    /// Base price with the discount taken off, rounded to minor units
    pub final_price: Decimal,

    pub currency: String,
}

impl PriceBreakdown {
    /// Units the base price was computed from
    #[inline]
    pub fn unit_count(&self) -> u32 {
        if self.is_hourly {
            self.hours
        } else {
            self.days
        }
    }

    /// Days used for per-day add-on pricing
    ///
    /// A sub-day hourly rental counts as one day.
    #[inline]
    pub fn billable_days(&self) -> u32 {
        billable_days(self.days)
    }

    /// Amount taken off by the discount
    pub fn discount_amount(&self) -> Decimal {
        self.base_price - self.final_price
    }

    pub fn applied_discount(&self) -> Option<AppliedDiscount> {
        self.discount_threshold.map(|threshold| AppliedDiscount {
            percentage: self.discount,
            threshold,
        })
    }
}
