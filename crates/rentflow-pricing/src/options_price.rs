//! Add-on pricing
//!
//! Prices the renter's add-on selection against the listing configuration.
//! Insurance and the second driver silently contribute nothing when the
//! listing does not offer them; an enabled delivery or flexible return on
//! a listing that does not offer it is an error, since the booking flow
//! should never have let it through.

use rentflow_core::{
    models::{
        billable_days, AddOn, AddressSelection, Coordinates, ListingOptionsConfig, OptionCharge,
        OptionSelection,
    },
    PricingError, PricingResult, PricingSettings,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{geo, reservation_options, round_money};

/// Per-add-on amounts, each rounded to the money scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsBreakdown {
    pub insurance: Decimal,
    pub second_driver: Decimal,
    pub delivery: Decimal,
    pub flexible_return: Decimal,
}

impl OptionsBreakdown {
    pub fn total(&self) -> Decimal {
        self.insurance + self.second_driver + self.delivery + self.flexible_return
    }

    /// Non-zero lines, in display order
    pub fn lines(&self) -> Vec<(AddOn, Decimal)> {
        [
            (AddOn::Insurance, self.insurance),
            (AddOn::SecondDriver, self.second_driver),
            (AddOn::Delivery, self.delivery),
            (AddOn::FlexibleReturn, self.flexible_return),
        ]
        .into_iter()
        .filter(|(_, amount)| !amount.is_zero())
        .collect()
    }
}

#[derive(Debug, Clone)]
pub struct OptionsPriceCalculator {
    rounding_scale: u32,
}

impl Default for OptionsPriceCalculator {
    fn default() -> Self {
        Self::new(&PricingSettings::default())
    }
}

impl OptionsPriceCalculator {
    pub fn new(settings: &PricingSettings) -> Self {
        Self {
            rounding_scale: settings.rounding_scale,
        }
    }

    /// Price each add-on of `selection` for a booking of `days` billed days
    ///
    /// Hourly bookings pass `days = 0`; per-day insurance then bills a
    /// single day.
    ///
    /// # Errors
    ///
    /// - `UnknownInsurancePolicy` when the selected policy id is not offered
    /// - `OptionUnavailable` for an enabled delivery or flexible return the
    ///   listing does not offer
    /// - `MissingListingCoordinates` / `MissingCoordinates` when a distance
    ///   cannot be computed
    /// - `OutOfRange` when a committed address no longer fits the radius
    #[instrument(skip(self, selection, config, listing_coordinates))]
    pub fn itemize(
        &self,
        selection: &OptionSelection,
        config: &ListingOptionsConfig,
        listing_coordinates: Option<Coordinates>,
        days: u32,
    ) -> PricingResult<OptionsBreakdown> {
        let breakdown = OptionsBreakdown {
            insurance: self.insurance(selection, config, billable_days(days))?,
            second_driver: self.second_driver(selection, config),
            delivery: self.distance_priced(
                AddOn::Delivery,
                &selection.delivery,
                config,
                listing_coordinates,
            )?,
            flexible_return: self.distance_priced(
                AddOn::FlexibleReturn,
                &selection.flexible_return,
                config,
                listing_coordinates,
            )?,
        };

        debug!("Options total {}", breakdown.total());
        Ok(breakdown)
    }

    /// Sum of all add-on amounts
    pub fn calculate(
        &self,
        selection: &OptionSelection,
        config: &ListingOptionsConfig,
        listing_coordinates: Option<Coordinates>,
        days: u32,
    ) -> PricingResult<Decimal> {
        self.itemize(selection, config, listing_coordinates, days)
            .map(|breakdown| breakdown.total())
    }

    fn insurance(
        &self,
        selection: &OptionSelection,
        config: &ListingOptionsConfig,
        billable_days: u32,
    ) -> PricingResult<Decimal> {
        if !selection.insurance {
            return Ok(Decimal::ZERO);
        }
        if !config.insurance.available {
            debug!("Insurance selected but not offered, ignoring");
            return Ok(Decimal::ZERO);
        }

        // listings without a policy list only carry the single legacy charge
        let charge: OptionCharge = match selection.insurance_policy_id.as_deref() {
            Some(id) if !config.insurance.policies.is_empty() => {
                config
                    .insurance
                    .policy(id)
                    .ok_or_else(|| PricingError::UnknownInsurancePolicy(id.to_string()))?
                    .charge
            }
            _ => config.insurance.charge,
        };

        charge
            .amount_for(billable_days)
            .map(|amount| round_money(amount, self.rounding_scale))
            .ok_or_else(|| {
                PricingError::InvalidInput(format!(
                    "insurance over {} days overflows",
                    billable_days
                ))
            })
    }

    fn second_driver(&self, selection: &OptionSelection, config: &ListingOptionsConfig) -> Decimal {
        if !selection.second_driver.enabled {
            return Decimal::ZERO;
        }
        if !config.second_driver.available {
            debug!("Second driver selected but not offered, ignoring");
            return Decimal::ZERO;
        }
        round_money(config.second_driver.price, self.rounding_scale)
    }

    fn distance_priced(
        &self,
        option: AddOn,
        address: &AddressSelection,
        config: &ListingOptionsConfig,
        listing_coordinates: Option<Coordinates>,
    ) -> PricingResult<Decimal> {
        if !address.enabled {
            return Ok(Decimal::ZERO);
        }

        let terms = reservation_options::radius_terms(option, config)?;
        let listing =
            listing_coordinates.ok_or(PricingError::MissingListingCoordinates { option })?;
        let target = address
            .coordinates
            .ok_or(PricingError::MissingCoordinates { option })?;

        let distance_km =
            reservation_options::check_radius(option, &target, Some(listing), terms.radius_km)?;
        let distance = geo::distance_to_decimal(distance_km)?;

        distance
            .checked_mul(terms.price_per_km)
            .map(|amount| round_money(amount, self.rounding_scale))
            .ok_or_else(|| {
                PricingError::InvalidInput(format!(
                    "{} over {:.2} km overflows",
                    option, distance_km
                ))
            })
    }
}
