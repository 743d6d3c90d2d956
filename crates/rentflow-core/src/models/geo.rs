//! Geographic value types

use serde::{Deserialize, Serialize};

/// A WGS84 point in decimal degrees
///
/// Values are not range-checked; the geocoding collaborator is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(alias = "latitude")]
    pub lat: f64,

    #[serde(alias = "longitude", alias = "lon")]
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// One result from the address-autocomplete collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressSuggestion {
    /// Display address
    pub address: String,

    pub latitude: f64,

    pub longitude: f64,
}

impl AddressSuggestion {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_accept_long_field_names() {
        let short: Coordinates = serde_json::from_str(r#"{"lat": 48.85, "lng": 2.35}"#).unwrap();
        let long: Coordinates =
            serde_json::from_str(r#"{"latitude": 48.85, "longitude": 2.35}"#).unwrap();
        assert_eq!(short, long);
    }

    #[test]
    fn test_suggestion_coordinates() {
        let suggestion = AddressSuggestion {
            address: "Place Bellecour, Lyon".to_string(),
            latitude: 45.7578,
            longitude: 4.8320,
        };
        assert_eq!(suggestion.coordinates(), Coordinates::new(45.7578, 4.8320));
    }
}
