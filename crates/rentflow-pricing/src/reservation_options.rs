//! Radius checks for delivery and flexible return
//!
//! An address is checked at the moment the renter picks it, before the
//! add-on is switched on. The commit functions return a new
//! [`OptionSelection`]; on rejection the caller keeps its old selection, so
//! an out-of-range address never reaches `enabled: true`.

use rentflow_core::{
    models::{
        AddOn, AddressSelection, AddressSuggestion, Coordinates, ListingConfiguration,
        ListingOptionsConfig, OptionSelection, ReturnMethod,
    },
    PricingError, PricingResult,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::geo;

/// Radius and per-km price of a radius-gated add-on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusTerms {
    pub radius_km: Decimal,
    pub price_per_km: Decimal,
}

/// Look up the radius terms the listing offers for `option`
///
/// # Errors
///
/// `OptionUnavailable` when the listing does not offer the add-on, and
/// `InvalidInput` for add-ons that are not radius-gated.
pub fn radius_terms(option: AddOn, config: &ListingOptionsConfig) -> PricingResult<RadiusTerms> {
    if !option.is_radius_gated() {
        return Err(PricingError::InvalidInput(format!(
            "{} is not a radius-gated option",
            option
        )));
    }

    match option {
        AddOn::Delivery if config.delivery.available => Ok(RadiusTerms {
            radius_km: config.delivery.radius_km,
            price_per_km: config.delivery.price_per_km,
        }),
        AddOn::FlexibleReturn => match config.pickup.return_method {
            ReturnMethod::Different {
                max_distance_km,
                price_per_km,
            } => Ok(RadiusTerms {
                radius_km: max_distance_km,
                price_per_km,
            }),
            ReturnMethod::Same => Err(PricingError::OptionUnavailable(option)),
        },
        AddOn::Delivery | AddOn::Insurance | AddOn::SecondDriver => {
            Err(PricingError::OptionUnavailable(option))
        }
    }
}

/// Distance from the listing to `coordinates`, if within `radius_km`
///
/// A distance that is not a finite number (NaN or infinite coordinates)
/// never passes.
pub(crate) fn check_radius(
    option: AddOn,
    coordinates: &Coordinates,
    listing_coordinates: Option<Coordinates>,
    radius_km: Decimal,
) -> PricingResult<f64> {
    let listing = listing_coordinates.ok_or(PricingError::MissingListingCoordinates { option })?;

    let distance_km = geo::distance_between(&listing, coordinates);
    if !distance_km.is_finite() {
        return Err(PricingError::InvalidInput(format!(
            "{} coordinates ({}, {}) are not valid",
            option, coordinates.lat, coordinates.lng
        )));
    }

    let radius = radius_km.to_f64().unwrap_or(0.0);
    if distance_km > radius {
        debug!(
            "Rejected {} address {:.2} km away (radius {} km)",
            option, distance_km, radius_km
        );
        return Err(PricingError::OutOfRange {
            option,
            distance_km,
            radius_km: radius,
        });
    }

    Ok(distance_km)
}

fn validate_address(
    option: AddOn,
    address: &str,
    coordinates: &Coordinates,
    listing_coordinates: Option<Coordinates>,
    radius_km: Decimal,
) -> PricingResult<f64> {
    if address.trim().is_empty() {
        return Err(PricingError::Validation(format!(
            "{} address is required",
            option
        )));
    }
    check_radius(option, coordinates, listing_coordinates, radius_km)
}

/// Check a delivery address against the delivery radius
///
/// Returns the distance in kilometres on success, `OutOfRange` carrying the
/// distance and radius otherwise.
pub fn validate_delivery(
    address: &str,
    coordinates: &Coordinates,
    listing_coordinates: Option<Coordinates>,
    radius_km: Decimal,
) -> PricingResult<f64> {
    validate_address(
        AddOn::Delivery,
        address,
        coordinates,
        listing_coordinates,
        radius_km,
    )
}

/// Check a return address against the maximum return distance
pub fn validate_flexible_return(
    address: &str,
    coordinates: &Coordinates,
    listing_coordinates: Option<Coordinates>,
    radius_km: Decimal,
) -> PricingResult<f64> {
    validate_address(
        AddOn::FlexibleReturn,
        address,
        coordinates,
        listing_coordinates,
        radius_km,
    )
}

/// Validate an address and, if it passes, return the selection with the
/// add-on switched on at that address
#[instrument(skip(selection, listing), fields(listing_id = %listing.listing_id))]
pub fn try_enable(
    option: AddOn,
    selection: &OptionSelection,
    address: &str,
    coordinates: Coordinates,
    listing: &ListingConfiguration,
) -> PricingResult<OptionSelection> {
    let terms = radius_terms(option, &listing.options)?;
    let distance_km = validate_address(
        option,
        address,
        &coordinates,
        listing.coordinates,
        terms.radius_km,
    )?;

    info!("Enabled {} at {:.2} km from the listing", option, distance_km);

    Ok(selection.clone().with_address(
        option,
        AddressSelection::enabled_at(address.to_string(), coordinates),
    ))
}

pub fn try_enable_delivery(
    selection: &OptionSelection,
    address: &str,
    coordinates: Coordinates,
    listing: &ListingConfiguration,
) -> PricingResult<OptionSelection> {
    try_enable(AddOn::Delivery, selection, address, coordinates, listing)
}

pub fn try_enable_flexible_return(
    selection: &OptionSelection,
    address: &str,
    coordinates: Coordinates,
    listing: &ListingConfiguration,
) -> PricingResult<OptionSelection> {
    try_enable(AddOn::FlexibleReturn, selection, address, coordinates, listing)
}

/// Commit an autocomplete suggestion as the address of `option`
pub fn try_enable_suggestion(
    option: AddOn,
    selection: &OptionSelection,
    suggestion: &AddressSuggestion,
    listing: &ListingConfiguration,
) -> PricingResult<OptionSelection> {
    try_enable(
        option,
        selection,
        &suggestion.address,
        suggestion.coordinates(),
        listing,
    )
}

/// Switch delivery off and forget its address
pub fn disable_delivery(selection: &OptionSelection) -> OptionSelection {
    selection
        .clone()
        .with_address(AddOn::Delivery, AddressSelection::disabled())
}

/// Switch flexible return off and forget its address
pub fn disable_flexible_return(selection: &OptionSelection) -> OptionSelection {
    selection
        .clone()
        .with_address(AddOn::FlexibleReturn, AddressSelection::disabled())
}
