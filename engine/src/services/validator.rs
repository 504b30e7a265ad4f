//! Feature batch validation
//!
//! Malformed records are dropped with a warning each; the batch as a whole
//! never fails here. Deciding that an empty result is fatal is the engine's job.

use std::collections::HashSet;

use shared::{
    check_feature, FeatureValidationWarning, GrainFeature, ValidationRule, ValidationThresholds,
};

/// Validates detector output before grading
#[derive(Debug, Clone)]
pub struct FeatureValidator {
    color_sum_tolerance: f64,
}

/// Records that passed validation, borrowed from the submitted batch
#[derive(Debug, Clone)]
pub struct ValidatedBatch<'a> {
    /// In submission order
    pub grains: Vec<&'a GrainFeature>,
    pub warnings: Vec<FeatureValidationWarning>,
}

impl ValidatedBatch<'_> {
    pub fn is_empty(&self) -> bool {
        self.grains.is_empty()
    }
}

impl FeatureValidator {
    pub fn new(thresholds: &ValidationThresholds) -> Self {
        Self {
            color_sum_tolerance: thresholds.color_sum_tolerance,
        }
    }

    /// Split a batch into valid records and warnings for the rest
    ///
    /// A grain id seen on an earlier valid record marks later records with the
    /// same id as duplicates.
    pub fn validate<'a>(&self, features: &'a [GrainFeature]) -> ValidatedBatch<'a> {
        let mut grains = Vec::with_capacity(features.len());
        let mut warnings = Vec::new();
        let mut seen_ids = HashSet::with_capacity(features.len());

        for (index, feature) in features.iter().enumerate() {
            let failures = check_feature(feature, self.color_sum_tolerance);

            if !failures.is_empty() {
                for (rule, message) in failures {
                    tracing::warn!(
                        grain_id = feature.grain_id,
                        index,
                        rule = %rule,
                        "Excluding feature record: {}",
                        message
                    );
                    warnings.push(FeatureValidationWarning {
                        index,
                        grain_id: feature.grain_id,
                        rule,
                        message: message.to_string(),
                    });
                }
                continue;
            }

            if !seen_ids.insert(feature.grain_id) {
                tracing::warn!(
                    grain_id = feature.grain_id,
                    index,
                    "Excluding duplicate grain id"
                );
                warnings.push(FeatureValidationWarning {
                    index,
                    grain_id: feature.grain_id,
                    rule: ValidationRule::DuplicateGrainId,
                    message: format!(
                        "Grain id {} already used by an earlier record",
                        feature.grain_id
                    ),
                });
                continue;
            }

            grains.push(feature);
        }

        tracing::debug!(
            "Validation complete: {} of {} records accepted, {} warnings",
            grains.len(),
            features.len(),
            warnings.len()
        );

        ValidatedBatch { grains, warnings }
    }
}
