//! Quote service
//!
//! Fetches a listing through a [`ListingConfigSource`], normalizes it and
//! prices a date range plus add-on selection in one call.

use rentflow_core::{
    models::{DateRange, ListingConfiguration, OptionSelection, PriceBreakdown},
    traits::ListingConfigSource,
    PricingError, PricingResult, PricingSettings,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{BasePriceCalculator, OptionsBreakdown, OptionsPriceCalculator};

/// Full price of a booking
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub listing_id: Uuid,

    pub breakdown: PriceBreakdown,

    pub options: OptionsBreakdown,

    /// Discounted rental price plus all add-ons
    pub total: Decimal,

    pub currency: String,
}

/// Prices bookings for listings fetched from `S`
pub struct QuoteService<S: ListingConfigSource> {
    source: Arc<S>,
    settings: PricingSettings,
    base: BasePriceCalculator,
    options: OptionsPriceCalculator,
}

impl<S: ListingConfigSource> QuoteService<S> {
    pub fn new(source: Arc<S>, settings: PricingSettings) -> Self {
        Self {
            source,
            base: BasePriceCalculator::new(settings.clone()),
            options: OptionsPriceCalculator::new(&settings),
            settings,
        }
    }

    /// Fetch and normalize a listing
    ///
    /// # Errors
    ///
    /// `ListingNotFound` when the source has no such listing, or any
    /// configuration error raised while migrating its documents.
    #[instrument(skip(self))]
    pub async fn load_listing(&self, listing_id: Uuid) -> PricingResult<ListingConfiguration> {
        let document = self
            .source
            .fetch(listing_id)
            .await?
            .ok_or(PricingError::ListingNotFound(listing_id))?;

        let listing =
            ListingConfiguration::from_json(document, &self.settings.default_currency)?;

        if listing.listing_id != listing_id {
            return Err(PricingError::InvalidListingConfig(format!(
                "source returned listing {} for {}",
                listing.listing_id, listing_id
            )));
        }

        debug!("Loaded listing {}", listing_id);
        Ok(listing)
    }

    /// Fetch a listing and quote a booking against it
    #[instrument(skip(self, selection))]
    pub async fn quote(
        &self,
        listing_id: Uuid,
        range: &DateRange,
        selection: &OptionSelection,
    ) -> PricingResult<Quote> {
        let listing = self.load_listing(listing_id).await?;
        self.quote_with(&listing, range, selection)
    }

    /// Quote a booking against an already loaded listing
    ///
    /// Booking surfaces call this on every date or option change, so it
    /// does no I/O.
    pub fn quote_with(
        &self,
        listing: &ListingConfiguration,
        range: &DateRange,
        selection: &OptionSelection,
    ) -> PricingResult<Quote> {
        let breakdown = self.base.calculate(range, &listing.pricing)?;
        let options = self.options.itemize(
            selection,
            &listing.options,
            listing.coordinates,
            breakdown.days,
        )?;

        let total = breakdown.final_price + options.total();

        info!(
            "Quoted listing {}: {} {} at {}, options {}, total {} {}",
            listing.listing_id,
            breakdown.unit_count(),
            if breakdown.is_hourly { "hours" } else { "days" },
            breakdown.final_price,
            options.total(),
            total,
            breakdown.currency
        );

        Ok(Quote {
            listing_id: listing.listing_id,
            currency: breakdown.currency.clone(),
            breakdown,
            options,
            total,
        })
    }
}
