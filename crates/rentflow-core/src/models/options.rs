//! Listing add-on models
//!
//! Hosts configure four optional add-ons: insurance, a second driver,
//! delivery to the renter's address and a flexible return point. The raw
//! [`ListingOptionsDocument`] mirrors what the listing editor stores; it is
//! migrated into [`ListingOptionsConfig`] where every insurance charge is
//! an explicit [`OptionCharge`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::listing::validate_non_negative;
use crate::{PricingError, PricingResult};

/// The optional add-ons a booking can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOn {
    Insurance,
    SecondDriver,
    Delivery,
    FlexibleReturn,
}

impl fmt::Display for AddOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddOn::Insurance => write!(f, "insurance"),
            AddOn::SecondDriver => write!(f, "second driver"),
            AddOn::Delivery => write!(f, "delivery"),
            AddOn::FlexibleReturn => write!(f, "flexible return"),
        }
    }
}

impl AddOn {
    /// Add-ons whose availability depends on a distance check
    pub fn is_radius_gated(&self) -> bool {
        matches!(self, AddOn::Delivery | AddOn::FlexibleReturn)
    }
}

/// How an insurance policy is charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "amount", rename_all = "snake_case")]
pub enum OptionCharge {
    /// No extra cost
    #[default]
    Included,
    /// One-time fee for the whole booking
    Flat(Decimal),
    /// Fee multiplied by the billed days
    PerDay(Decimal),
}

impl OptionCharge {
    /// Build from the editor's `price` / `pricePerDay` pair
    ///
    /// A positive per-day price wins over a flat one; zero or missing
    /// amounts mean the policy is included.
    pub fn from_fields(price: Option<Decimal>, price_per_day: Option<Decimal>) -> Self {
        match (price_per_day, price) {
            (Some(per_day), _) if per_day > Decimal::ZERO => OptionCharge::PerDay(per_day),
            (_, Some(flat)) if flat > Decimal::ZERO => OptionCharge::Flat(flat),
            _ => OptionCharge::Included,
        }
    }

    /// Cost of this charge over a booking of `days` billed days
    ///
    /// `None` when a per-day amount overflows.
    #[inline]
    pub fn amount_for(&self, days: u32) -> Option<Decimal> {
        match self {
            OptionCharge::Included => Some(Decimal::ZERO),
            OptionCharge::Flat(amount) => Some(*amount),
            OptionCharge::PerDay(amount) => amount.checked_mul(Decimal::from(days)),
        }
    }

    fn is_negative(&self) -> bool {
        match self {
            OptionCharge::Included => false,
            OptionCharge::Flat(amount) | OptionCharge::PerDay(amount) => *amount < Decimal::ZERO,
        }
    }
}

/// A named insurance policy a renter can choose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsurancePolicy {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub charge: OptionCharge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceConfig {
    pub available: bool,

    /// Single-policy charge from listings created before policy lists
    pub charge: OptionCharge,

    pub policies: Vec<InsurancePolicy>,
}

impl InsuranceConfig {
    pub fn policy(&self, id: &str) -> Option<&InsurancePolicy> {
        self.policies.iter().find(|p| p.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SecondDriverConfig {
    pub available: bool,

    /// One-time fee, not multiplied by days
    #[validate(custom(function = "validate_non_negative"))]
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryConfig {
    pub available: bool,

    /// Maximum distance from the listing's pickup point
    #[validate(custom(function = "validate_non_negative"))]
    pub radius_km: Decimal,

    #[validate(custom(function = "validate_non_negative"))]
    pub price_per_km: Decimal,
}

/// Where the vehicle has to be brought back
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ReturnMethod {
    /// Back to the pickup point; flexible return is not offered
    #[default]
    Same,
    /// Renter may pick a return address within the radius
    Different {
        max_distance_km: Decimal,
        price_per_km: Decimal,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PickupConfig {
    pub return_method: ReturnMethod,
}

/// Normalized add-on configuration for one listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListingOptionsConfig {
    pub insurance: InsuranceConfig,

    #[validate(nested)]
    pub second_driver: SecondDriverConfig,

    #[validate(nested)]
    pub delivery: DeliveryConfig,

    pub pickup: PickupConfig,
}

impl ListingOptionsConfig {
    /// Validate field ranges, including the ones derive cannot reach
    pub fn check(&self) -> PricingResult<()> {
        self.validate()?;

        let mut insurance_charges = std::iter::once(&self.insurance.charge)
            .chain(self.insurance.policies.iter().map(|p| &p.charge));
        if insurance_charges.any(OptionCharge::is_negative) {
            return Err(PricingError::InvalidListingConfig(
                "insurance price must not be negative".to_string(),
            ));
        }

        if let ReturnMethod::Different {
            max_distance_km,
            price_per_km,
        } = self.pickup.return_method
        {
            if max_distance_km < Decimal::ZERO || price_per_km < Decimal::ZERO {
                return Err(PricingError::InvalidListingConfig(
                    "return distance and price must not be negative".to_string(),
                ));
            }
        }

        Ok(())
    }
}

// ==================== Raw document ====================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInsurancePolicy {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    price: Option<Decimal>,
    #[serde(default)]
    price_per_day: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInsurance {
    #[serde(default)]
    available: bool,
    #[serde(default)]
    price: Option<Decimal>,
    #[serde(default)]
    price_per_day: Option<Decimal>,
    #[serde(default)]
    policies: Vec<RawInsurancePolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSecondDriver {
    #[serde(default)]
    available: bool,
    #[serde(default)]
    price: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDelivery {
    #[serde(default)]
    available: bool,
    #[serde(default, alias = "radius")]
    radius_km: Decimal,
    #[serde(default)]
    price_per_km: Decimal,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawReturnMethod {
    #[default]
    Same,
    Different,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPickup {
    #[serde(default)]
    return_method: RawReturnMethod,
    #[serde(default)]
    return_max_distance_km: Option<Decimal>,
    #[serde(default)]
    return_price_per_km: Option<Decimal>,
}

/// Add-on configuration as stored by the listing editor
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingOptionsDocument {
    #[serde(default)]
    insurance: Option<RawInsurance>,
    #[serde(default)]
    second_driver: Option<RawSecondDriver>,
    #[serde(default)]
    delivery: Option<RawDelivery>,
    #[serde(default)]
    pickup: Option<RawPickup>,
}

impl ListingOptionsDocument {
    /// Normalize into [`ListingOptionsConfig`] and validate it
    pub fn migrate(self) -> PricingResult<ListingOptionsConfig> {
        let insurance = self.insurance.unwrap_or_default();
        let second_driver = self.second_driver.unwrap_or_default();
        let delivery = self.delivery.unwrap_or_default();
        let pickup = self.pickup.unwrap_or_default();

        // from_fields folds non-positive amounts into Included, so negatives
        // have to be caught on the raw values
        let raw_insurance_amounts = [insurance.price, insurance.price_per_day]
            .into_iter()
            .chain(
                insurance
                    .policies
                    .iter()
                    .flat_map(|p| [p.price, p.price_per_day]),
            )
            .flatten();
        for amount in raw_insurance_amounts {
            if amount < Decimal::ZERO {
                return Err(PricingError::InvalidListingConfig(
                    "insurance price must not be negative".to_string(),
                ));
            }
        }

        let return_method = match pickup.return_method {
            RawReturnMethod::Same => ReturnMethod::Same,
            // A missing radius leaves only the pickup point itself selectable
            RawReturnMethod::Different => ReturnMethod::Different {
                max_distance_km: pickup.return_max_distance_km.unwrap_or_default(),
                price_per_km: pickup.return_price_per_km.unwrap_or_default(),
            },
        };

        let config = ListingOptionsConfig {
            insurance: InsuranceConfig {
                available: insurance.available,
                charge: OptionCharge::from_fields(insurance.price, insurance.price_per_day),
                policies: insurance
                    .policies
                    .into_iter()
                    .map(|p| InsurancePolicy {
                        name: if p.name.is_empty() { p.id.clone() } else { p.name },
                        id: p.id,
                        description: p.description,
                        charge: OptionCharge::from_fields(p.price, p.price_per_day),
                    })
                    .collect(),
            },
            second_driver: SecondDriverConfig {
                available: second_driver.available,
                price: second_driver.price,
            },
            delivery: DeliveryConfig {
                available: delivery.available,
                radius_km: delivery.radius_km,
                price_per_km: delivery.price_per_km,
            },
            pickup: PickupConfig { return_method },
        };

        config.check()?;
        Ok(config)
    }
}
