//! Lift CLI - terminal front end for the lift test budget calculator.
//!
//! The binary in `main.rs` only parses arguments and prints; building inputs,
//! running calculations and rendering live here so they can be tested
//! without spawning a process.

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::cast_precision_loss
)]

pub mod calculate;
pub mod output;
pub mod settings;

pub use calculate::{CalculationReport, InputArgs, OutputFormat};
