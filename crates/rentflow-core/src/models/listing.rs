//! Listing tariff models
//!
//! A listing's pricing arrives as a JSON document in one of two shapes:
//! the legacy blob (loose discount keys, deprecated weekend and chauffeur
//! prices) and the current versioned shape with an explicit discount tier
//! table. [`ListingPricingDocument::migrate`] converts either into a
//! [`ListingPricingConfig`] once, at load time, so pricing code only ever
//! sees the current shape.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::geo::Coordinates;
use super::options::{ListingOptionsConfig, ListingOptionsDocument};
use crate::{PricingError, PricingResult};

/// Rejects negative money amounts and distances
pub(crate) fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("negative_amount"));
    }
    Ok(())
}

/// Duration bracket a discount tier starts at
///
/// Serialized as its day count (3, 7 or 30).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum DiscountThreshold {
    ThreeDays,
    Week,
    Month,
}

impl DiscountThreshold {
    /// Minimum number of billed days for the tier to apply
    pub fn days(self) -> u32 {
        match self {
            DiscountThreshold::ThreeDays => 3,
            DiscountThreshold::Week => 7,
            DiscountThreshold::Month => 30,
        }
    }
}

impl TryFrom<u32> for DiscountThreshold {
    type Error = String;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        match days {
            3 => Ok(DiscountThreshold::ThreeDays),
            7 => Ok(DiscountThreshold::Week),
            30 => Ok(DiscountThreshold::Month),
            other => Err(format!(
                "unsupported discount threshold {} (expected 3, 7 or 30)",
                other
            )),
        }
    }
}

impl From<DiscountThreshold> for u32 {
    fn from(threshold: DiscountThreshold) -> Self {
        threshold.days()
    }
}

impl fmt::Display for DiscountThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} days", self.days())
    }
}

/// A duration-based price reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DiscountTier {
    pub threshold: DiscountThreshold,

    /// Percentage taken off the base price (0-100)
    #[validate(range(max = 100))]
    pub percentage: u8,
}

impl DiscountTier {
    pub fn new(threshold: DiscountThreshold, percentage: u8) -> Self {
        Self {
            threshold,
            percentage,
        }
    }

    /// A tier with a zero percentage is configured but switched off
    #[inline]
    pub fn is_active(&self) -> bool {
        self.percentage > 0
    }
}

/// Normalized listing tariff, the only shape the pricing engine reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListingPricingConfig {
    /// Reference daily rate
    #[validate(custom(function = "validate_non_negative"))]
    pub price_per_day: Decimal,

    /// ISO 4217 code, informational only
    #[serde(default)]
    pub currency: String,

    /// Whether short bookings may be billed by the hour
    #[serde(default)]
    pub hourly_allowed: bool,

    /// Hourly rate, required when hourly billing kicks in
    #[serde(default)]
    pub price_per_hour: Option<Decimal>,

    /// Zero to three tiers, one per threshold
    #[serde(default)]
    #[validate(nested)]
    pub discount_tiers: Vec<DiscountTier>,
}

impl ListingPricingConfig {
    /// Daily-only tariff without discounts
    pub fn daily(price_per_day: Decimal, currency: &str) -> Self {
        Self {
            price_per_day,
            currency: currency.to_string(),
            hourly_allowed: false,
            price_per_hour: None,
            discount_tiers: Vec::new(),
        }
    }

    pub fn with_hourly(mut self, price_per_hour: Decimal) -> Self {
        self.hourly_allowed = true;
        self.price_per_hour = Some(price_per_hour);
        self
    }

    pub fn with_tier(mut self, threshold: DiscountThreshold, percentage: u8) -> Self {
        self.discount_tiers.push(DiscountTier::new(threshold, percentage));
        self
    }

    /// Whether longer active tiers never give a smaller percentage
    ///
    /// The listing editor enforces this; pricing tolerates violations.
    pub fn tiers_are_monotonic(&self) -> bool {
        let mut active: Vec<&DiscountTier> =
            self.discount_tiers.iter().filter(|t| t.is_active()).collect();
        active.sort_by_key(|t| t.threshold);
        active.windows(2).all(|w| w[0].percentage <= w[1].percentage)
    }

    /// Validate field ranges and cross-field rules
    pub fn check(&self) -> PricingResult<()> {
        self.validate()?;

        if let Some(rate) = self.price_per_hour {
            if validate_non_negative(&rate).is_err() {
                return Err(PricingError::InvalidListingConfig(
                    "price_per_hour must not be negative".to_string(),
                ));
            }
        }

        let mut seen = HashSet::new();
        for tier in &self.discount_tiers {
            if !seen.insert(tier.threshold) {
                return Err(PricingError::InvalidListingConfig(format!(
                    "discount tier for {} is configured twice",
                    tier.threshold
                )));
            }
        }

        if !self.tiers_are_monotonic() {
            warn!(
                "Discount tiers are not monotonic: {:?}",
                self.discount_tiers
            );
        }

        Ok(())
    }
}

// ==================== Legacy document ====================

/// One entry of the legacy `discounts` object
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyDiscount {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,

    #[serde(default)]
    pub percentage: Option<Decimal>,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyDiscounts {
    #[serde(default, alias = "threeDay", alias = "days3")]
    pub three_days: Option<LegacyDiscount>,

    #[serde(default, alias = "week", alias = "days7")]
    pub weekly: Option<LegacyDiscount>,

    #[serde(default, alias = "month", alias = "days30")]
    pub monthly: Option<LegacyDiscount>,
}

/// Pricing blob as stored before discount tiers existed
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPricingData {
    #[serde(alias = "price")]
    pub price_per_day: Decimal,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default, alias = "hourlyAllowed")]
    pub hourly_rental: bool,

    #[serde(default, alias = "hourlyPrice")]
    pub price_per_hour: Option<Decimal>,

    #[serde(default)]
    pub discounts: LegacyDiscounts,

    /// Deprecated, ignored by pricing
    #[serde(default)]
    pub price_weekend: Option<Decimal>,

    /// Deprecated, ignored by pricing
    #[serde(default)]
    pub chauffeur_daily: Option<Decimal>,
}

impl LegacyPricingData {
    fn into_config(self, default_currency: &str) -> PricingResult<ListingPricingConfig> {
        if self.price_weekend.is_some() || self.chauffeur_daily.is_some() {
            debug!("Dropping deprecated weekend/chauffeur prices from legacy pricing");
        }

        let mut discount_tiers = Vec::new();
        let legacy = [
            (DiscountThreshold::ThreeDays, self.discounts.three_days),
            (DiscountThreshold::Week, self.discounts.weekly),
            (DiscountThreshold::Month, self.discounts.monthly),
        ];
        for (threshold, entry) in legacy {
            let Some(entry) = entry else { continue };
            let Some(raw) = entry.percentage else { continue };
            if !entry.enabled {
                continue;
            }
            let percentage = legacy_percentage(raw)?;
            if percentage > 0 {
                discount_tiers.push(DiscountTier::new(threshold, percentage));
            }
        }

        Ok(ListingPricingConfig {
            price_per_day: self.price_per_day,
            currency: self
                .currency
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| default_currency.to_string()),
            hourly_allowed: self.hourly_rental,
            price_per_hour: self.price_per_hour,
            discount_tiers,
        })
    }
}

/// Legacy percentages may be fractional; they are rounded to whole percent
fn legacy_percentage(raw: Decimal) -> PricingResult<u8> {
    raw.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u8()
        .filter(|p| *p <= 100)
        .ok_or_else(|| {
            PricingError::InvalidListingConfig(format!(
                "discount percentage {} is outside 0-100",
                raw
            ))
        })
}

// ==================== Versioned document ====================

/// Listing pricing as fetched, before normalization
#[derive(Debug, Clone)]
pub enum ListingPricingDocument {
    /// Unversioned or `version: 1` blob
    Legacy(LegacyPricingData),
    /// `version: 2`, already in tier form
    Current(ListingPricingConfig),
}

impl ListingPricingDocument {
    pub const CURRENT_VERSION: u64 = 2;

    /// Detect the document shape
    ///
    /// An explicit `version` wins; otherwise the presence of
    /// `discountTiers` marks the current shape.
    pub fn from_json(value: Value) -> PricingResult<Self> {
        let version = value.get("version").and_then(Value::as_u64);
        match version {
            Some(Self::CURRENT_VERSION) => Ok(Self::Current(serde_json::from_value(value)?)),
            Some(1) => Ok(Self::Legacy(serde_json::from_value(value)?)),
            Some(other) => Err(PricingError::InvalidListingConfig(format!(
                "unsupported pricing document version {}",
                other
            ))),
            None if value.get("discountTiers").is_some() => {
                Ok(Self::Current(serde_json::from_value(value)?))
            }
            None => Ok(Self::Legacy(serde_json::from_value(value)?)),
        }
    }

    /// Normalize into the current shape and validate it
    pub fn migrate(self, default_currency: &str) -> PricingResult<ListingPricingConfig> {
        let config = match self {
            Self::Current(mut config) => {
                if config.currency.is_empty() {
                    config.currency = default_currency.to_string();
                }
                config
            }
            Self::Legacy(legacy) => {
                debug!("Migrating legacy pricing document");
                legacy.into_config(default_currency)?
            }
        };
        config.check()?;
        Ok(config)
    }
}

// ==================== Listing bundle ====================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingEnvelope {
    #[serde(alias = "id")]
    listing_id: Uuid,

    pricing: Value,

    #[serde(default)]
    options: Option<ListingOptionsDocument>,

    #[serde(default, alias = "location")]
    coordinates: Option<Coordinates>,
}

/// Everything the engine needs about one listing, normalized
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingConfiguration {
    pub listing_id: Uuid,

    pub pricing: ListingPricingConfig,

    pub options: ListingOptionsConfig,

    /// Fixed pickup point, absent for listings without one
    pub coordinates: Option<Coordinates>,
}

impl ListingConfiguration {
    /// Parse, migrate and validate a fetched listing document
    pub fn from_json(value: Value, default_currency: &str) -> PricingResult<Self> {
        let envelope: ListingEnvelope = serde_json::from_value(value)?;

        let pricing = ListingPricingDocument::from_json(envelope.pricing)?.migrate(default_currency)?;
        let options = envelope.options.unwrap_or_default().migrate()?;

        Ok(Self {
            listing_id: envelope.listing_id,
            pricing,
            options,
            coordinates: envelope.coordinates,
        })
    }
}
