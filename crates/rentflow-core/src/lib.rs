//! Rentflow Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the Rentflow pricing engine. It includes:
//!
//! - Domain models (listing tariffs, options, selections, price breakdowns)
//! - Versioned configuration documents and their load-time migration
//! - Collaborator traits for listing fetch and address autocomplete
//! - Unified error handling with a stable error taxonomy
//! - Engine configuration and tracing bootstrap

pub mod config;
pub mod error;
pub mod models;
pub mod telemetry;
pub mod traits;

pub use config::{EngineConfig, PricingSettings};
pub use error::{ErrorKind, PricingError};

/// Result type alias using PricingError
pub type PricingResult<T> = Result<T, PricingError>;
