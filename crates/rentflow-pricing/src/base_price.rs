//! Base rental price
//!
//! Combines the billable units with the listing's unit rate and the single
//! applicable duration discount.

use rentflow_core::{
    models::{DateRange, ListingPricingConfig, PriceBreakdown},
    PricingError, PricingResult, PricingSettings,
};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::{discount, duration, round_money};

/// Rental price calculator
///
/// Stateless apart from its settings; share one instance across sessions.
#[derive(Debug, Clone, Default)]
pub struct BasePriceCalculator {
    settings: PricingSettings,
}

impl BasePriceCalculator {
    pub fn new(settings: PricingSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PricingSettings {
        &self.settings
    }

    /// Price a date range against a listing tariff
    ///
    /// Hourly bookings never receive a duration discount: they are by
    /// construction shorter than the smallest tier.
    ///
    /// # Errors
    ///
    /// - `InvalidDateRange` when `end <= start`
    /// - `MissingHourlyRate` when the booking is billed hourly but the
    ///   listing has no hourly price
    #[instrument(skip(self, config), fields(price_per_day = %config.price_per_day))]
    pub fn calculate(
        &self,
        range: &DateRange,
        config: &ListingPricingConfig,
    ) -> PricingResult<PriceBreakdown> {
        let units = duration::compute_units(
            range.start,
            range.end,
            config.hourly_allowed,
            self.settings.hourly_threshold_hours,
        )?;

        let unit_rate = if units.is_hourly {
            config.price_per_hour.ok_or(PricingError::MissingHourlyRate)?
        } else {
            config.price_per_day
        };

        let scale = self.settings.rounding_scale;
        let base_price = unit_rate
            .checked_mul(Decimal::from(units.count))
            .map(|amount| round_money(amount, scale))
            .ok_or_else(|| {
                PricingError::InvalidInput(format!(
                    "rate {} over {} units overflows",
                    unit_rate, units.count
                ))
            })?;

        let applied = if units.is_hourly {
            None
        } else {
            discount::resolve(units.count, &config.discount_tiers)
        };

        let percentage = applied.map_or(0, |d| d.percentage);
        // (100 - p) / 100 is exact and at most 1, so this cannot overflow
        let kept_share =
            (Decimal::ONE_HUNDRED - Decimal::from(percentage)) / Decimal::ONE_HUNDRED;
        let final_price = round_money(base_price * kept_share, scale);

        debug!(
            "Priced {} {} at {}: base {}, discount {}%, final {}",
            units.count,
            if units.is_hourly { "hours" } else { "days" },
            unit_rate,
            base_price,
            percentage,
            final_price
        );

        Ok(PriceBreakdown {
            days: if units.is_hourly { 0 } else { units.count },
            hours: if units.is_hourly { units.count } else { 0 },
            is_hourly: units.is_hourly,
            base_price,
            discount: percentage,
            discount_threshold: applied.map(|d| d.threshold),
            final_price,
            currency: config.currency.clone(),
        })
    }
}
