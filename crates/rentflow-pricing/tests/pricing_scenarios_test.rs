//! End-to-end pricing scenarios
//!
//! Run with: cargo test -p rentflow-pricing --test pricing_scenarios_test

use chrono::{DateTime, Duration, TimeZone, Utc};
use rentflow_core::models::{
    AddOn, Coordinates, DateRange, DiscountThreshold, ListingConfiguration, OptionSelection,
};
use rentflow_core::{PricingError, PricingSettings};
use rentflow_pricing::{
    constants::EARTH_RADIUS_KM, discount, duration, geo, reservation_options,
    BasePriceCalculator, OptionsPriceCalculator, QuoteService,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

// ============================================================================
// Fixtures
// ============================================================================

const PARIS: Coordinates = Coordinates {
    lat: 48.8566,
    lng: 2.3522,
};

const LYON: Coordinates = Coordinates {
    lat: 45.7640,
    lng: 4.8357,
};

fn pickup() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 9, 30, 0).unwrap()
}

fn booking(duration: Duration) -> DateRange {
    DateRange::new(pickup(), pickup() + duration).unwrap()
}

/// Point `km` kilometres due north of Paris
fn north_of_paris(km: f64) -> Coordinates {
    Coordinates::new(PARIS.lat + km / EARTH_RADIUS_KM.to_radians(), PARIS.lng)
}

fn listing_document(id: Uuid) -> Value {
    json!({
        "id": id,
        "pricing": {
            "pricePerDay": 50,
            "currency": "EUR",
            "hourlyAllowed": true,
            "pricePerHour": 8,
            "discountTiers": [
                {"threshold": 3, "percentage": 10},
                {"threshold": 7, "percentage": 15},
                {"threshold": 30, "percentage": 25}
            ]
        },
        "options": {
            "insurance": {
                "available": true,
                "policies": [
                    {"id": "basic", "name": "Basic cover", "price": 25},
                    {"id": "full", "name": "Full cover", "pricePerDay": 12}
                ]
            },
            "secondDriver": {"available": true, "price": 15},
            "delivery": {"available": true, "radiusKm": 50, "pricePerKm": 2},
            "pickup": {
                "returnMethod": "different",
                "returnMaxDistanceKm": 30,
                "returnPricePerKm": 1
            }
        },
        "coordinates": {"latitude": 48.8566, "longitude": 2.3522}
    })
}

fn listing() -> ListingConfiguration {
    let id = Uuid::new_v4();
    ListingConfiguration::from_json(listing_document(id), "EUR").unwrap()
}

struct StaticListing(Value);

#[async_trait::async_trait]
impl rentflow_core::traits::ListingConfigSource for StaticListing {
    async fn fetch(&self, _listing_id: Uuid) -> Result<Option<Value>, PricingError> {
        Ok(Some(self.0.clone()))
    }
}

// ============================================================================
// Duration and discount
// ============================================================================

#[test]
fn test_exact_days_bill_that_many_days() {
    for n in [1u32, 3, 7, 29, 30, 90] {
        let range = booking(Duration::days(i64::from(n)));
        let units = duration::compute_units(range.start, range.end, false, 24).unwrap();
        assert_eq!(units.count, n);

        let plus_hour = booking(Duration::days(i64::from(n)) + Duration::hours(1));
        let units = duration::compute_units(plus_hour.start, plus_hour.end, false, 24).unwrap();
        assert_eq!(units.count, n + 1);
    }
}

#[test]
fn test_discount_boundaries_on_listing_tiers() {
    let listing = listing();
    let tiers = &listing.pricing.discount_tiers;

    let expected = [
        (2, None),
        (3, Some(10)),
        (6, Some(10)),
        (7, Some(15)),
        (29, Some(15)),
        (30, Some(25)),
        (45, Some(25)),
    ];
    for (days, percentage) in expected {
        assert_eq!(
            discount::resolve(days, tiers).map(|d| d.percentage),
            percentage,
            "{} days",
            days
        );
    }
}

#[test]
fn test_weekly_booking_end_to_end() {
    let listing = listing();
    let breakdown = BasePriceCalculator::default()
        .calculate(&booking(Duration::days(7)), &listing.pricing)
        .unwrap();

    assert_eq!(breakdown.days, 7);
    assert_eq!(breakdown.base_price, dec!(350));
    assert_eq!(breakdown.discount, 15);
    assert_eq!(breakdown.discount_threshold, Some(DiscountThreshold::Week));
    assert_eq!(breakdown.final_price, dec!(297.50));
    assert_eq!(breakdown.discount_amount(), dec!(52.50));
}

#[test]
fn test_short_hourly_booking() {
    let listing = listing();
    let breakdown = BasePriceCalculator::default()
        .calculate(
            &booking(Duration::hours(3) + Duration::minutes(10)),
            &listing.pricing,
        )
        .unwrap();

    assert!(breakdown.is_hourly);
    assert_eq!(breakdown.hours, 4);
    assert_eq!(breakdown.base_price, dec!(32));
    assert_eq!(breakdown.final_price, dec!(32));
}

#[test]
fn test_hourly_threshold_from_settings() {
    let listing = listing();
    let settings = PricingSettings {
        hourly_threshold_hours: 6,
        ..PricingSettings::default()
    };

    let breakdown = BasePriceCalculator::new(settings)
        .calculate(&booking(Duration::hours(8)), &listing.pricing)
        .unwrap();

    assert!(!breakdown.is_hourly);
    assert_eq!(breakdown.days, 1);
    assert_eq!(breakdown.final_price, dec!(50));
}

// ============================================================================
// Distance-gated add-ons
// ============================================================================

#[test]
fn test_paris_lyon_distance() {
    let d = geo::distance_between(&PARIS, &LYON);
    assert!((d - 391.5).abs() < 2.0, "got {} km", d);
}

#[test]
fn test_delivery_ten_km_at_two_per_km() {
    let listing = listing();
    let selection = reservation_options::try_enable_delivery(
        &OptionSelection::none(),
        "Stade de France",
        north_of_paris(10.0),
        &listing,
    )
    .unwrap();

    let options = OptionsPriceCalculator::default()
        .itemize(&selection, &listing.options, listing.coordinates, 2)
        .unwrap();
    assert_eq!(options.delivery, dec!(20.00));
    assert_eq!(options.total(), dec!(20.00));
}

#[test]
fn test_delivery_outside_radius_never_enabled() {
    let listing = listing();
    let before = OptionSelection::none();

    let err = reservation_options::try_enable_delivery(
        &before,
        "Beauvais",
        north_of_paris(60.0),
        &listing,
    )
    .unwrap_err();

    match err {
        PricingError::OutOfRange {
            option,
            distance_km,
            radius_km,
        } => {
            assert_eq!(option, AddOn::Delivery);
            assert!((distance_km - 60.0).abs() < 1e-6);
            assert_eq!(radius_km, 50.0);
        }
        other => panic!("expected OutOfRange, got {:?}", other),
    }
    assert!(!before.delivery.enabled);
}

#[test]
fn test_flexible_return_radius() {
    let listing = listing();

    let selection = reservation_options::try_enable_flexible_return(
        &OptionSelection::none(),
        "Orly",
        north_of_paris(-14.0),
        &listing,
    )
    .unwrap();
    let options = OptionsPriceCalculator::default()
        .itemize(&selection, &listing.options, listing.coordinates, 3)
        .unwrap();
    assert_eq!(options.flexible_return, dec!(14.00));

    let err = reservation_options::try_enable_flexible_return(
        &selection,
        "Chantilly",
        north_of_paris(35.0),
        &listing,
    )
    .unwrap_err();
    assert_eq!(err.error_code(), "out_of_range");
}

// ============================================================================
// Full quote
// ============================================================================

#[tokio::test]
async fn test_full_quote_with_every_add_on() {
    let id = Uuid::new_v4();
    let service = QuoteService::new(
        Arc::new(StaticListing(listing_document(id))),
        PricingSettings::default(),
    );
    let listing = service.load_listing(id).await.unwrap();

    let selection = OptionSelection::none()
        .with_insurance(Some("full"))
        .with_second_driver();
    let selection = reservation_options::try_enable_delivery(
        &selection,
        "Saint-Denis",
        north_of_paris(10.0),
        &listing,
    )
    .unwrap();
    let selection = reservation_options::try_enable_flexible_return(
        &selection,
        "Orly",
        north_of_paris(-14.0),
        &listing,
    )
    .unwrap();

    let quote = service
        .quote(id, &booking(Duration::days(7)), &selection)
        .await
        .unwrap();

    // 297.50 rental + 84 insurance + 15 driver + 20 delivery + 14 return
    assert_eq!(quote.options.insurance, dec!(84));
    assert_eq!(quote.options.second_driver, dec!(15));
    assert_eq!(quote.total, dec!(430.50));

    let without_return = reservation_options::disable_flexible_return(&selection);
    let cheaper = service
        .quote_with(&listing, &booking(Duration::days(7)), &without_return)
        .unwrap();
    assert_eq!(quote.total - cheaper.total, dec!(14.00));
    assert_eq!(cheaper.options.flexible_return, Decimal::ZERO);
}

#[tokio::test]
async fn test_quote_rejects_inverted_range() {
    let id = Uuid::new_v4();
    let service = QuoteService::new(
        Arc::new(StaticListing(listing_document(id))),
        PricingSettings::default(),
    );

    let inverted = DateRange {
        start: pickup(),
        end: pickup() - Duration::days(2),
    };
    let err = service
        .quote(id, &inverted, &OptionSelection::none())
        .await
        .unwrap_err();
    assert!(matches!(err, PricingError::InvalidDateRange { .. }));
}
