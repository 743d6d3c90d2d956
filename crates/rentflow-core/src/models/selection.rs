//! Renter-side add-on selection
//!
//! Owned by the booking session and recomputed on every change. Radius-gated
//! add-ons must only be switched on through the validate-then-commit
//! functions in the pricing crate, so an enabled delivery or flexible return
//! always carries coordinates that passed the distance check.

use serde::{Deserialize, Serialize};

use super::geo::Coordinates;
use super::options::AddOn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ToggleSelection {
    #[serde(default)]
    pub enabled: bool,
}

/// Selection state of an add-on tied to an address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressSelection {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

impl AddressSelection {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn enabled_at(address: String, coordinates: Coordinates) -> Self {
        Self {
            enabled: true,
            address: Some(address),
            coordinates: Some(coordinates),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OptionSelection {
    #[serde(default)]
    pub insurance: bool,

    #[serde(default)]
    pub insurance_policy_id: Option<String>,

    #[serde(default)]
    pub second_driver: ToggleSelection,

    #[serde(default)]
    pub delivery: AddressSelection,

    #[serde(default)]
    pub flexible_return: AddressSelection,
}

impl OptionSelection {
    /// Nothing selected
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_insurance(mut self, policy_id: Option<&str>) -> Self {
        self.insurance = true;
        self.insurance_policy_id = policy_id.map(str::to_string);
        self
    }

    pub fn with_second_driver(mut self) -> Self {
        self.second_driver.enabled = true;
        self
    }

    /// Address state of a radius-gated add-on
    pub fn address(&self, option: AddOn) -> Option<&AddressSelection> {
        match option {
            AddOn::Delivery => Some(&self.delivery),
            AddOn::FlexibleReturn => Some(&self.flexible_return),
            AddOn::Insurance | AddOn::SecondDriver => None,
        }
    }

    /// Replace the address state of a radius-gated add-on
    ///
    /// Does not check the distance; booking flows commit addresses through
    /// `rentflow_pricing::reservation_options` instead.
    pub fn with_address(mut self, option: AddOn, selection: AddressSelection) -> Self {
        match option {
            AddOn::Delivery => self.delivery = selection,
            AddOn::FlexibleReturn => self.flexible_return = selection,
            AddOn::Insurance | AddOn::SecondDriver => {}
        }
        self
    }

    /// Whether an add-on is currently switched on
    pub fn is_enabled(&self, option: AddOn) -> bool {
        match option {
            AddOn::Insurance => self.insurance,
            AddOn::SecondDriver => self.second_driver.enabled,
            AddOn::Delivery => self.delivery.enabled,
            AddOn::FlexibleReturn => self.flexible_return.enabled,
        }
    }
}
