//! Great-circle distance between coordinates
//!
//! Inputs are not validated: NaN or out-of-range degrees produce a
//! meaningless distance, never a panic.

use rentflow_core::{models::Coordinates, PricingError, PricingResult};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::constants::EARTH_RADIUS_KM;

/// Haversine distance in kilometres
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Haversine distance between two points
#[inline]
pub fn distance_between(a: &Coordinates, b: &Coordinates) -> f64 {
    distance_km(a.lat, a.lng, b.lat, b.lng)
}

/// Whether `point` lies within `radius_km` of `center` (inclusive)
pub fn is_within_radius(center: &Coordinates, point: &Coordinates, radius_km: Decimal) -> bool {
    match radius_km.to_f64() {
        Some(radius) => distance_between(center, point) <= radius,
        None => false,
    }
}

/// Convert a distance into a decimal for money arithmetic
pub(crate) fn distance_to_decimal(distance_km: f64) -> PricingResult<Decimal> {
    Decimal::from_f64(distance_km).ok_or_else(|| {
        PricingError::InvalidInput(format!("distance {} km is not a finite number", distance_km))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const PARIS: Coordinates = Coordinates {
        lat: 48.8566,
        lng: 2.3522,
    };
    const LYON: Coordinates = Coordinates {
        lat: 45.7640,
        lng: 4.8357,
    };

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(distance_between(&PARIS, &PARIS), 0.0);
        assert_eq!(distance_km(-33.86, 151.2, -33.86, 151.2), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let there = distance_between(&PARIS, &LYON);
        let back = distance_between(&LYON, &PARIS);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn test_paris_lyon() {
        let d = distance_between(&PARIS, &LYON);
        assert!((d - 392.0).abs() < 5.0, "got {} km", d);
    }

    #[test]
    fn test_monotonic_with_separation() {
        let near = distance_km(48.8566, 2.3522, 48.9566, 2.3522);
        let far = distance_km(48.8566, 2.3522, 49.0566, 2.3522);
        assert!(near < far);
    }

    #[test]
    fn test_within_radius_is_inclusive_at_zero() {
        assert!(is_within_radius(&PARIS, &PARIS, dec!(0)));
        assert!(!is_within_radius(&PARIS, &LYON, dec!(50)));
        assert!(is_within_radius(&PARIS, &LYON, dec!(400)));
    }

    #[test]
    fn test_non_finite_distance_rejected() {
        assert!(distance_to_decimal(f64::NAN).is_err());
        assert!(distance_to_decimal(12.5).is_ok());
    }
}
