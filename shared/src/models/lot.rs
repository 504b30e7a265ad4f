//! Lot classification request and outcome
//!
//! These are the boundary types exchanged with the surrounding service: the
//! detector output for one lot goes in, the report plus per-bean audit trail
//! and validation warnings come out.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{GrainClassification, GrainFeature, LotQualityReport};
use crate::validation::FeatureValidationWarning;

/// Invocation context passed through to the report untouched
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LotContext {
    pub lot_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<String>,
}

impl LotContext {
    pub fn new(lot_id: Uuid) -> Self {
        Self {
            lot_id,
            image_reference: None,
        }
    }

    pub fn with_image_reference(mut self, image_reference: impl Into<String>) -> Self {
        self.image_reference = Some(image_reference.into());
        self
    }
}

/// Detector output for one lot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotClassificationRequest {
    #[serde(flatten)]
    pub context: LotContext,
    pub features: Vec<GrainFeature>,
}

/// Everything the engine returns for a successfully graded lot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotClassificationOutcome {
    pub report: LotQualityReport,
    /// One per validated feature, in submission order
    pub classifications: Vec<GrainClassification>,
    pub warnings: Vec<FeatureValidationWarning>,
}
