//! Elapsed time to billable units
//!
//! Days and hours are both ceilings: a booking of 7 days and 1 hour is
//! billed as 8 days, 3h10 as 4 hours.

use chrono::{DateTime, Utc};
use rentflow_core::{models::BillableUnits, PricingError, PricingResult};

use crate::constants::{MILLIS_PER_DAY, MILLIS_PER_HOUR};

/// Compute the billable unit count for a booking
///
/// Hourly billing applies only when the listing allows it and the elapsed
/// time is strictly below `hourly_threshold_hours`; everything else is
/// billed in whole days, at least one.
///
/// # Errors
///
/// `InvalidDateRange` when `end <= start`; the range is never clamped.
pub fn compute_units(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    hourly_allowed: bool,
    hourly_threshold_hours: u32,
) -> PricingResult<BillableUnits> {
    let elapsed_ms = (end - start).num_milliseconds();
    if elapsed_ms <= 0 {
        return Err(PricingError::InvalidDateRange { start, end });
    }

    let threshold_ms = i64::from(hourly_threshold_hours) * MILLIS_PER_HOUR;

    if hourly_allowed && elapsed_ms < threshold_ms {
        let hours = ceil_div(elapsed_ms, MILLIS_PER_HOUR);
        return Ok(BillableUnits {
            count: to_count(hours)?,
            is_hourly: true,
        });
    }

    let days = ceil_div(elapsed_ms, MILLIS_PER_DAY).max(1);
    Ok(BillableUnits {
        count: to_count(days)?,
        is_hourly: false,
    })
}

#[inline]
fn ceil_div(value: i64, unit: i64) -> i64 {
    (value + unit - 1) / unit
}

fn to_count(units: i64) -> PricingResult<u32> {
    u32::try_from(units)
        .map_err(|_| PricingError::InvalidInput(format!("booking of {} units is too long", units)))
}
