//! Unified error handling for Rentflow pricing
//!
//! Every failure the engine can report is a variant of [`PricingError`].
//! Variants are grouped into an [`ErrorKind`] so callers can decide how to
//! surface them: configuration problems grey out a control, validation
//! problems are shown to the user, input problems are programmer errors.

use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::models::AddOn;

/// Coarse classification of a [`PricingError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The listing configuration cannot support the request
    Configuration,
    /// A user choice was rejected and can be corrected
    Validation,
    /// The caller passed inputs it should never have passed
    Input,
    /// A collaborator (listing source, autocomplete) failed
    Collaborator,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "configuration"),
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Input => write!(f, "input"),
            ErrorKind::Collaborator => write!(f, "collaborator"),
        }
    }
}

/// Main pricing error type
#[derive(Error, Debug)]
pub enum PricingError {
    // ==================== Configuration Errors ====================
    #[error("Hourly billing requested but the listing has no hourly rate")]
    MissingHourlyRate,

    #[error("{option} cannot be priced: listing has no fixed coordinates")]
    MissingListingCoordinates { option: AddOn },

    #[error("{0} is not offered by this listing")]
    OptionUnavailable(AddOn),

    #[error("Invalid listing configuration: {0}")]
    InvalidListingConfig(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // ==================== Validation Errors ====================
    #[error("{option} address is {distance_km:.1} km away, allowed radius is {radius_km} km")]
    OutOfRange {
        option: AddOn,
        distance_km: f64,
        radius_km: f64,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    // ==================== Input Errors ====================
    #[error("Invalid date range: end {end} is not after start {start}")]
    InvalidDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("{option} is enabled without selected coordinates")]
    MissingCoordinates { option: AddOn },

    #[error("Unknown insurance policy: {0}")]
    UnknownInsurancePolicy(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // ==================== Collaborator Errors ====================
    #[error("Listing not found: {0}")]
    ListingNotFound(Uuid),

    #[error("Address lookup failed: {0}")]
    AddressLookup(String),
}

impl PricingError {
    /// Returns the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PricingError::MissingHourlyRate
            | PricingError::MissingListingCoordinates { .. }
            | PricingError::OptionUnavailable(_)
            | PricingError::InvalidListingConfig(_)
            | PricingError::Config(_) => ErrorKind::Configuration,

            PricingError::OutOfRange { .. } | PricingError::Validation(_) => {
                ErrorKind::Validation
            }

            PricingError::InvalidDateRange { .. }
            | PricingError::MissingCoordinates { .. }
            | PricingError::UnknownInsurancePolicy(_)
            | PricingError::InvalidInput(_)
            | PricingError::Serialization(_) => ErrorKind::Input,

            PricingError::ListingNotFound(_) | PricingError::AddressLookup(_) => {
                ErrorKind::Collaborator
            }
        }
    }

    /// Stable machine-readable code, safe to match on in clients
    pub fn error_code(&self) -> &'static str {
        match self {
            PricingError::MissingHourlyRate => "missing_hourly_rate",
            PricingError::MissingListingCoordinates { .. } => "missing_listing_coordinates",
            PricingError::OptionUnavailable(_) => "option_unavailable",
            PricingError::InvalidListingConfig(_) => "invalid_listing_config",
            PricingError::Config(_) => "config_error",
            PricingError::OutOfRange { .. } => "out_of_range",
            PricingError::Validation(_) => "validation_error",
            PricingError::InvalidDateRange { .. } => "invalid_date_range",
            PricingError::MissingCoordinates { .. } => "missing_coordinates",
            PricingError::UnknownInsurancePolicy(_) => "unknown_insurance_policy",
            PricingError::InvalidInput(_) => "invalid_input",
            PricingError::Serialization(_) => "serialization_error",
            PricingError::ListingNotFound(_) => "listing_not_found",
            PricingError::AddressLookup(_) => "address_lookup_error",
        }
    }

    /// Only validation errors can be fixed by the user picking something else
    pub fn is_recoverable(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for PricingError {
    fn from(err: serde_json::Error) -> Self {
        PricingError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for PricingError {
    fn from(err: config::ConfigError) -> Self {
        PricingError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for PricingError {
    fn from(err: validator::ValidationErrors) -> Self {
        PricingError::InvalidListingConfig(err.to_string())
    }
}
