//! Lift Common - Shared types, utilities, and configuration for the lift budget calculator.
//!
//! This crate provides:
//! - Configuration types and loading
//! - Configuration and input validation primitives
//! - Error types and handling utilities
//! - Logging setup

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;
pub mod validation;

pub use config::{CalculatorDefaults, Config, NetworkConfig, ObservabilityConfig, ServicesConfig};
pub use error::{Error, Result};
pub use validation::{Validate, ValidationError, ValidationResult};
