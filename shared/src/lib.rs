//! Shared types and models for grain quality classification
//!
//! This crate contains the detector feature records, per-bean and lot-level
//! results, and threshold configuration shared between the grading engine,
//! the WASM bindings, and the services that call them.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
