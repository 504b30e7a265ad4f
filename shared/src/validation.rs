//! Validation utilities for detector feature records
//!
//! Field checks return `Err` with a static message; [`check_feature`] runs
//! all of them and reports every rule a record breaks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{BoundingBox, ColorClass, GrainFeature};

/// Rule a feature record failed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRule {
    NonFiniteValue,
    NegativePercentage,
    ColorCompositionSum,
    NonPositiveArea,
    ShapeIrregularityRange,
    CrackRatioRange,
    EmptyBoundingBox,
    DuplicateGrainId,
}

impl ValidationRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationRule::NonFiniteValue => "non_finite_value",
            ValidationRule::NegativePercentage => "negative_percentage",
            ValidationRule::ColorCompositionSum => "color_composition_sum",
            ValidationRule::NonPositiveArea => "non_positive_area",
            ValidationRule::ShapeIrregularityRange => "shape_irregularity_range",
            ValidationRule::CrackRatioRange => "crack_ratio_range",
            ValidationRule::EmptyBoundingBox => "empty_bounding_box",
            ValidationRule::DuplicateGrainId => "duplicate_grain_id",
        }
    }
}

impl std::fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Soft, per-record validation failure; the record is excluded from the lot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureValidationWarning {
    /// Position of the record in the submitted batch
    pub index: usize,
    pub grain_id: u32,
    pub rule: ValidationRule,
    pub message: String,
}

// ============================================================================
// Field Validations
// ============================================================================

/// Validate color percentages are non-negative and sum to 100 within tolerance
pub fn validate_color_composition(
    composition: &BTreeMap<ColorClass, f64>,
    tolerance: f64,
) -> Result<(), &'static str> {
    if composition.values().any(|p| *p < 0.0) {
        return Err("Color percentages cannot be negative");
    }
    let total: f64 = composition.values().sum();
    if (total - 100.0).abs() > tolerance {
        return Err("Color percentages must sum to 100");
    }
    Ok(())
}

/// Validate area is strictly positive
pub fn validate_area(area: f64) -> Result<(), &'static str> {
    if area <= 0.0 {
        return Err("Area must be positive");
    }
    Ok(())
}

/// Validate a ratio lies in [0, 1]
pub fn validate_unit_interval(value: f64) -> Result<(), &'static str> {
    if !(0.0..=1.0).contains(&value) {
        return Err("Value must be between 0 and 1");
    }
    Ok(())
}

/// Validate the bounding region has a non-zero extent
pub fn validate_bounding_box(bbox: &BoundingBox) -> Result<(), &'static str> {
    if bbox.width == 0 || bbox.height == 0 {
        return Err("Bounding box must have non-zero width and height");
    }
    Ok(())
}

/// Check every numeric measurement is finite
pub fn is_finite_feature(feature: &GrainFeature) -> bool {
    feature.area.is_finite()
        && feature.shape_irregularity.is_finite()
        && feature.crack_ratio.is_finite()
        && feature.color_composition.values().all(|p| p.is_finite())
}

/// Run every record-level check and return each rule that failed
///
/// A record with non-finite measurements only reports that rule, since the
/// range checks are meaningless for NaN.
pub fn check_feature(
    feature: &GrainFeature,
    color_sum_tolerance: f64,
) -> Vec<(ValidationRule, &'static str)> {
    if !is_finite_feature(feature) {
        return vec![(
            ValidationRule::NonFiniteValue,
            "Feature measurements must be finite numbers",
        )];
    }

    let mut failures = Vec::new();

    if let Err(msg) = validate_color_composition(&feature.color_composition, color_sum_tolerance)
    {
        let rule = if feature.color_composition.values().any(|p| *p < 0.0) {
            ValidationRule::NegativePercentage
        } else {
            ValidationRule::ColorCompositionSum
        };
        failures.push((rule, msg));
    }
    if let Err(msg) = validate_area(feature.area) {
        failures.push((ValidationRule::NonPositiveArea, msg));
    }
    if validate_unit_interval(feature.shape_irregularity).is_err() {
        failures.push((
            ValidationRule::ShapeIrregularityRange,
            "Shape irregularity must be between 0 and 1",
        ));
    }
    if validate_unit_interval(feature.crack_ratio).is_err() {
        failures.push((
            ValidationRule::CrackRatioRange,
            "Crack ratio must be between 0 and 1",
        ));
    }
    if let Err(msg) = validate_bounding_box(&feature.bounding_box) {
        failures.push((ValidationRule::EmptyBoundingBox, msg));
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_feature() -> GrainFeature {
        GrainFeature {
            grain_id: 1,
            bounding_box: BoundingBox {
                x: 10,
                y: 10,
                width: 32,
                height: 24,
            },
            color_composition: [(ColorClass::Medium, 85.0), (ColorClass::Light, 15.0)]
                .into_iter()
                .collect(),
            area: 1100.0,
            shape_irregularity: 0.15,
            crack_ratio: 0.02,
        }
    }

    #[test]
    fn test_validate_color_composition_valid() {
        let f = valid_feature();
        assert!(validate_color_composition(&f.color_composition, 1.0).is_ok());
    }

    #[test]
    fn test_validate_color_composition_within_tolerance() {
        let composition = [(ColorClass::Medium, 60.4), (ColorClass::Dark, 40.4)]
            .into_iter()
            .collect();
        assert!(validate_color_composition(&composition, 1.0).is_ok());
        assert!(validate_color_composition(&composition, 0.5).is_err());
    }

    #[test]
    fn test_validate_color_composition_invalid_sum() {
        let composition = [(ColorClass::Medium, 60.0), (ColorClass::Dark, 20.0)]
            .into_iter()
            .collect();
        assert!(validate_color_composition(&composition, 1.0).is_err());
    }

    #[test]
    fn test_validate_color_composition_empty() {
        assert!(validate_color_composition(&BTreeMap::new(), 1.0).is_err());
    }

    #[test]
    fn test_validate_area() {
        assert!(validate_area(0.1).is_ok());
        assert!(validate_area(0.0).is_err());
        assert!(validate_area(-5.0).is_err());
    }

    #[test]
    fn test_validate_unit_interval() {
        assert!(validate_unit_interval(0.0).is_ok());
        assert!(validate_unit_interval(1.0).is_ok());
        assert!(validate_unit_interval(-0.01).is_err());
        assert!(validate_unit_interval(1.01).is_err());
    }

    #[test]
    fn test_check_feature_valid_record() {
        assert!(check_feature(&valid_feature(), 1.0).is_empty());
    }

    #[test]
    fn test_check_feature_reports_every_rule() {
        let mut f = valid_feature();
        f.area = 0.0;
        f.crack_ratio = 1.5;
        f.bounding_box.width = 0;
        let rules: Vec<ValidationRule> = check_feature(&f, 1.0).into_iter().map(|(r, _)| r).collect();
        assert_eq!(
            rules,
            vec![
                ValidationRule::NonPositiveArea,
                ValidationRule::CrackRatioRange,
                ValidationRule::EmptyBoundingBox,
            ]
        );
    }

    #[test]
    fn test_check_feature_negative_percentage() {
        let mut f = valid_feature();
        f.color_composition.insert(ColorClass::Dark, -5.0);
        f.color_composition.insert(ColorClass::Light, 20.0);
        let failures = check_feature(&f, 1.0);
        assert_eq!(failures[0].0, ValidationRule::NegativePercentage);
    }

    #[test]
    fn test_check_feature_non_finite() {
        let mut f = valid_feature();
        f.shape_irregularity = f64::NAN;
        let failures = check_feature(&f, 1.0);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, ValidationRule::NonFiniteValue);
    }
}
