//! Collaborator traits
//!
//! The engine itself does no I/O. These are the two outside services the
//! booking surfaces need before they can call it: fetching a listing's
//! configuration and resolving free-text addresses to coordinates.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::PricingError;
use crate::models::AddressSuggestion;

/// Source of listing configuration documents
#[async_trait]
pub trait ListingConfigSource: Send + Sync {
    /// Fetch the raw listing document (`pricing`, `options`, `coordinates`)
    ///
    /// Returns `Ok(None)` when the listing does not exist.
    async fn fetch(&self, listing_id: Uuid) -> Result<Option<Value>, PricingError>;
}

/// Address autocomplete / geocoding service
#[async_trait]
pub trait AddressAutocomplete: Send + Sync {
    /// Suggest addresses for free text, best match first
    async fn suggest(&self, query: &str, limit: usize)
        -> Result<Vec<AddressSuggestion>, PricingError>;
}
