//! Domain models for grain quality classification

mod grading;
mod grain;
mod lot;
mod report;
mod thresholds;

pub use grading::*;
pub use grain::*;
pub use lot::*;
pub use report::*;
pub use thresholds::*;
