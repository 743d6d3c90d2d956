//! Address suggestions for delivery and flexible return
//!
//! Wraps the autocomplete collaborator and annotates each suggestion with
//! its distance from the listing, so the picker can grey out addresses
//! that would be rejected on commit.

use rentflow_core::{
    models::{AddOn, AddressSuggestion, ListingConfiguration, OptionSelection},
    traits::AddressAutocomplete,
    PricingError, PricingResult,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::{geo, reservation_options};

/// Autocomplete suggestion with its reachability from the listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressCandidate {
    pub suggestion: AddressSuggestion,

    pub distance_km: f64,

    /// Whether committing this address would pass the radius check
    pub in_range: bool,
}

pub struct AddressSelectionService<A: AddressAutocomplete> {
    autocomplete: Arc<A>,
}

impl<A: AddressAutocomplete> AddressSelectionService<A> {
    pub fn new(autocomplete: Arc<A>) -> Self {
        Self { autocomplete }
    }

    /// Suggest addresses for a radius-gated add-on
    ///
    /// A blank query returns no candidates without calling the
    /// autocomplete service.
    ///
    /// # Errors
    ///
    /// `OptionUnavailable` when the listing does not offer `option`,
    /// `MissingListingCoordinates` when it has no pickup point, and any
    /// error raised by the autocomplete service.
    #[instrument(skip(self, listing), fields(listing_id = %listing.listing_id))]
    pub async fn suggest_for(
        &self,
        option: AddOn,
        query: &str,
        listing: &ListingConfiguration,
        limit: usize,
    ) -> PricingResult<Vec<AddressCandidate>> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let terms = reservation_options::radius_terms(option, &listing.options)?;
        let center = listing
            .coordinates
            .ok_or(PricingError::MissingListingCoordinates { option })?;

        let suggestions = self
            .autocomplete
            .suggest(query, limit)
            .await
            .map_err(|e| {
                warn!("Address autocomplete failed for {}: {}", option, e);
                match e {
                    lookup @ PricingError::AddressLookup(_) => lookup,
                    other => PricingError::AddressLookup(other.to_string()),
                }
            })?;

        let candidates: Vec<AddressCandidate> = suggestions
            .into_iter()
            .take(limit)
            .map(|suggestion| {
                let point = suggestion.coordinates();
                AddressCandidate {
                    distance_km: geo::distance_between(&center, &point),
                    in_range: geo::is_within_radius(&center, &point, terms.radius_km),
                    suggestion,
                }
            })
            .collect();

        debug!(
            "{} of {} suggestions within {} km",
            candidates.iter().filter(|c| c.in_range).count(),
            candidates.len(),
            terms.radius_km
        );

        Ok(candidates)
    }

    /// Commit a chosen candidate to the selection
    ///
    /// Runs the same radius check as a typed address; `in_range` on the
    /// candidate is advisory only.
    pub fn commit(
        &self,
        option: AddOn,
        selection: &OptionSelection,
        candidate: &AddressCandidate,
        listing: &ListingConfiguration,
    ) -> PricingResult<OptionSelection> {
        reservation_options::try_enable_suggestion(option, selection, &candidate.suggestion, listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rentflow_core::models::{
        Coordinates, DeliveryConfig, ListingOptionsConfig, ListingPricingConfig,
    };
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    use crate::constants::EARTH_RADIUS_KM;

    const PARIS: Coordinates = Coordinates {
        lat: 48.8566,
        lng: 2.3522,
    };

    struct MockAutocomplete {
        suggestions: Vec<AddressSuggestion>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AddressAutocomplete for MockAutocomplete {
        async fn suggest(&self, _query: &str, _limit: usize) -> PricingResult<Vec<AddressSuggestion>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.suggestions.clone())
        }
    }

    struct DownAutocomplete;

    #[async_trait]
    impl AddressAutocomplete for DownAutocomplete {
        async fn suggest(&self, _query: &str, _limit: usize) -> PricingResult<Vec<AddressSuggestion>> {
            Err(PricingError::InvalidInput("quota exceeded".to_string()))
        }
    }

    fn north_of_paris(name: &str, km: f64) -> AddressSuggestion {
        AddressSuggestion {
            address: name.to_string(),
            latitude: PARIS.lat + km / EARTH_RADIUS_KM.to_radians(),
            longitude: PARIS.lng,
        }
    }

    fn mock() -> Arc<MockAutocomplete> {
        Arc::new(MockAutocomplete {
            suggestions: vec![
                north_of_paris("Saint-Denis", 8.0),
                north_of_paris("Senlis", 40.0),
                north_of_paris("Compiegne", 70.0),
            ],
            calls: AtomicUsize::new(0),
        })
    }

    fn listing() -> ListingConfiguration {
        ListingConfiguration {
            listing_id: Uuid::new_v4(),
            pricing: ListingPricingConfig::daily(dec!(45), "EUR"),
            options: ListingOptionsConfig {
                delivery: DeliveryConfig {
                    available: true,
                    radius_km: dec!(50),
                    price_per_km: dec!(1),
                },
                ..Default::default()
            },
            coordinates: Some(PARIS),
        }
    }

    #[tokio::test]
    async fn test_candidates_flag_out_of_range() {
        let service = AddressSelectionService::new(mock());
        let candidates = service
            .suggest_for(AddOn::Delivery, "rue", &listing(), 5)
            .await
            .unwrap();

        assert_eq!(candidates.len(), 3);
        assert!(candidates[0].in_range);
        assert!(candidates[1].in_range);
        assert!(!candidates[2].in_range);
        assert!((candidates[2].distance_km - 70.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_limit_truncates_results() {
        let service = AddressSelectionService::new(mock());
        let candidates = service
            .suggest_for(AddOn::Delivery, "rue", &listing(), 2)
            .await
            .unwrap();
        assert_eq!(candidates.len(), 2);
    }

    #[tokio::test]
    async fn test_blank_query_skips_autocomplete() {
        let autocomplete = mock();
        let service = AddressSelectionService::new(autocomplete.clone());

        let candidates = service
            .suggest_for(AddOn::Delivery, "   ", &listing(), 5)
            .await
            .unwrap();

        assert!(candidates.is_empty());
        assert_eq!(autocomplete.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unavailable_option_rejected_before_lookup() {
        let autocomplete = mock();
        let service = AddressSelectionService::new(autocomplete.clone());

        let err = service
            .suggest_for(AddOn::FlexibleReturn, "gare", &listing(), 5)
            .await
            .unwrap_err();

        assert!(matches!(err, PricingError::OptionUnavailable(AddOn::FlexibleReturn)));
        assert_eq!(autocomplete.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_collaborator_error() {
        let service = AddressSelectionService::new(Arc::new(DownAutocomplete));
        let err = service
            .suggest_for(AddOn::Delivery, "gare", &listing(), 5)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "address_lookup_error");
    }

    #[tokio::test]
    async fn test_invalid_suggestion_never_committed() {
        let autocomplete = Arc::new(MockAutocomplete {
            suggestions: vec![AddressSuggestion {
                address: "Unknown".to_string(),
                latitude: f64::NAN,
                longitude: PARIS.lng,
            }],
            calls: AtomicUsize::new(0),
        });
        let service = AddressSelectionService::new(autocomplete);
        let listing = listing();

        let candidates = service
            .suggest_for(AddOn::Delivery, "unknown", &listing, 5)
            .await
            .unwrap();
        assert!(!candidates[0].in_range);

        let err = service
            .commit(AddOn::Delivery, &OptionSelection::none(), &candidates[0], &listing)
            .unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_commit_rechecks_radius() {
        let service = AddressSelectionService::new(mock());
        let listing = listing();
        let candidates = service
            .suggest_for(AddOn::Delivery, "rue", &listing, 5)
            .await
            .unwrap();

        let selection = service
            .commit(AddOn::Delivery, &OptionSelection::none(), &candidates[0], &listing)
            .unwrap();
        assert!(selection.delivery.enabled);
        assert_eq!(selection.delivery.address.as_deref(), Some("Saint-Denis"));

        let err = service
            .commit(AddOn::Delivery, &selection, &candidates[2], &listing)
            .unwrap_err();
        assert!(matches!(err, PricingError::OutOfRange { .. }));
    }
}
