//! lift-api - HTTP service for incrementality test budget calculations.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::{build_router, AppState, CalculateRequest, ContextRequest};
