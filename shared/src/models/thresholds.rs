//! Tunable classification thresholds
//!
//! Every stage of the grading pipeline reads its limits from a
//! [`ClassificationConfig`] value handed to it at construction time. Nothing
//! here is process-wide; recalibrating means building a new value.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Complete threshold set for one classification run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate, Default)]
pub struct ClassificationConfig {
    #[validate]
    pub validation: ValidationThresholds,
    #[validate]
    pub defects: DefectThresholds,
    #[validate]
    pub severity: SeverityWeights,
    #[validate]
    pub size: SizeBounds,
    #[validate]
    pub categories: CategoryBands,
}

/// Record-level validation limits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct ValidationThresholds {
    /// Allowed deviation of the color percentage sum from 100
    #[validate(range(min = 0.0, max = 100.0))]
    pub color_sum_tolerance: f64,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            color_sum_tolerance: 1.0,
        }
    }
}

/// Defect detection thresholds (all comparisons are strict `>`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct DefectThresholds {
    #[validate(range(min = 0.0, max = 1.0))]
    pub crack_threshold: f64,
    /// Dark color percentage
    #[validate(range(min = 0.0, max = 100.0))]
    pub dark_threshold: f64,
    /// Green color percentage
    #[validate(range(min = 0.0, max = 100.0))]
    pub green_threshold: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub shape_threshold: f64,
}

impl Default for DefectThresholds {
    fn default() -> Self {
        Self {
            crack_threshold: 0.30,
            dark_threshold: 25.0,
            green_threshold: 30.0,
            shape_threshold: 0.30,
        }
    }
}

/// Score points subtracted per defect
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct SeverityWeights {
    /// Severity of a crack just over the threshold
    #[validate(range(min = 0.0, max = 100.0))]
    pub crack_base: f64,
    /// Additional severity per unit of crack ratio above the threshold
    #[validate(range(min = 0.0))]
    pub crack_per_unit_excess: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub crack_max: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub dark: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub green: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub shape: f64,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            crack_base: 10.0,
            crack_per_unit_excess: 50.0,
            crack_max: 30.0,
            dark: 20.0,
            green: 15.0,
            shape: 5.0,
        }
    }
}

/// Area bounds for size classes and their score adjustments
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct SizeBounds {
    /// Beans below this area are small
    #[validate(range(min = 0.0))]
    pub small_max: f64,
    /// Beans above this area are large
    #[validate(range(min = 0.0))]
    pub large_min: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub large_bonus: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub small_penalty: f64,
}

impl Default for SizeBounds {
    fn default() -> Self {
        Self {
            small_max: 500.0,
            large_min: 2000.0,
            large_bonus: 2.0,
            small_penalty: 3.0,
        }
    }
}

/// Minimum scores for each quality category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct CategoryBands {
    #[validate(range(min = 0.0, max = 100.0))]
    pub specialty: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub premium: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub standard: f64,
    /// Beans with a critical defect scoring below this are below standard
    #[validate(range(min = 0.0, max = 100.0))]
    pub critical_cap: f64,
}

impl Default for CategoryBands {
    fn default() -> Self {
        Self {
            specialty: 90.0,
            premium: 75.0,
            standard: 60.0,
            critical_cap: 70.0,
        }
    }
}

impl ClassificationConfig {
    /// Every numeric threshold with its dotted key, for finiteness checks
    pub fn numeric_fields(&self) -> [(&'static str, f64); 19] {
        [
            ("validation.color_sum_tolerance", self.validation.color_sum_tolerance),
            ("defects.crack_threshold", self.defects.crack_threshold),
            ("defects.dark_threshold", self.defects.dark_threshold),
            ("defects.green_threshold", self.defects.green_threshold),
            ("defects.shape_threshold", self.defects.shape_threshold),
            ("severity.crack_base", self.severity.crack_base),
            ("severity.crack_per_unit_excess", self.severity.crack_per_unit_excess),
            ("severity.crack_max", self.severity.crack_max),
            ("severity.dark", self.severity.dark),
            ("severity.green", self.severity.green),
            ("severity.shape", self.severity.shape),
            ("size.small_max", self.size.small_max),
            ("size.large_min", self.size.large_min),
            ("size.large_bonus", self.size.large_bonus),
            ("size.small_penalty", self.size.small_penalty),
            ("categories.specialty", self.categories.specialty),
            ("categories.premium", self.categories.premium),
            ("categories.standard", self.categories.standard),
            ("categories.critical_cap", self.categories.critical_cap),
        ]
    }
}
