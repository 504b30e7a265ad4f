//! Grain quality classification engine
//!
//! Grades detector feature records for a coffee lot: flags defects per bean,
//! scores and categorizes each bean, and aggregates a lot quality report.
//! Pure computation; image handling, persistence and transport live in the
//! calling service.

pub mod config;
pub mod error;
pub mod services;

pub use config::{validate_thresholds, Config};
pub use error::{EngineError, EngineResult, ErrorDetail};
pub use services::*;
