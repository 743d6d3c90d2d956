//! Domain models for Rentflow pricing
//!
//! This module contains all the core domain models used by the pricing engine.

pub mod booking;
pub mod geo;
pub mod listing;
pub mod options;
pub mod selection;

pub use booking::{billable_days, AppliedDiscount, BillableUnits, DateRange, PriceBreakdown};
pub use geo::{AddressSuggestion, Coordinates};
pub use listing::{
    DiscountThreshold, DiscountTier, LegacyDiscount, LegacyDiscounts, LegacyPricingData,
    ListingConfiguration, ListingPricingConfig, ListingPricingDocument,
};
pub use options::{
    AddOn, DeliveryConfig, InsuranceConfig, InsurancePolicy, ListingOptionsConfig,
    ListingOptionsDocument, OptionCharge, PickupConfig, ReturnMethod, SecondDriverConfig,
};
pub use selection::{AddressSelection, OptionSelection, ToggleSelection};
