//! Per-bean grading models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{CategoryBands, ColorClass};

/// Visual defect detected on a single bean
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DefectType {
    Cracked,
    DarkDefective,
    ImmatureGreen,
    IrregularShape,
}

impl DefectType {
    pub const ALL: [DefectType; 4] = [
        DefectType::Cracked,
        DefectType::DarkDefective,
        DefectType::ImmatureGreen,
        DefectType::IrregularShape,
    ];

    /// Critical defects cap the reachable quality category
    pub fn is_critical(&self) -> bool {
        match self {
            DefectType::Cracked | DefectType::DarkDefective | DefectType::ImmatureGreen => true,
            DefectType::IrregularShape => false,
        }
    }
}

impl std::fmt::Display for DefectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefectType::Cracked => write!(f, "Cracked"),
            DefectType::DarkDefective => write!(f, "Dark Defective"),
            DefectType::ImmatureGreen => write!(f, "Immature Green"),
            DefectType::IrregularShape => write!(f, "Irregular Shape"),
        }
    }
}

/// A defect flagged on one bean
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefectRecord {
    pub grain_id: u32,
    pub defect_type: DefectType,
    /// Score points subtracted by the scorer
    pub severity: f64,
    pub critical: bool,
}

/// Size bucket derived from calibrated area
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Small,
    Standard,
    Large,
}

impl SizeClass {
    pub const ALL: [SizeClass; 3] = [SizeClass::Small, SizeClass::Standard, SizeClass::Large];
}

impl std::fmt::Display for SizeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SizeClass::Small => write!(f, "Small"),
            SizeClass::Standard => write!(f, "Standard"),
            SizeClass::Large => write!(f, "Large"),
        }
    }
}

/// International quality category, best first
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QualityCategory {
    Specialty,
    Premium,
    Standard,
    BelowStandard,
}

impl QualityCategory {
    pub const ALL: [QualityCategory; 4] = [
        QualityCategory::Specialty,
        QualityCategory::Premium,
        QualityCategory::Standard,
        QualityCategory::BelowStandard,
    ];

    /// Numeric rank for comparison (higher is better)
    pub fn rank(&self) -> u8 {
        match self {
            QualityCategory::Specialty => 4,
            QualityCategory::Premium => 3,
            QualityCategory::Standard => 2,
            QualityCategory::BelowStandard => 1,
        }
    }
}

impl std::fmt::Display for QualityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityCategory::Specialty => write!(f, "Specialty"),
            QualityCategory::Premium => write!(f, "Premium"),
            QualityCategory::Standard => write!(f, "Standard"),
            QualityCategory::BelowStandard => write!(f, "Below Standard"),
        }
    }
}

/// Classify a bean from its score and whether it carries a critical defect
///
/// First matching rule wins:
/// 1. critical defect and score below the critical cap → below standard
/// 2. score ≥ specialty band with no critical defect → specialty
/// 3. score ≥ premium band → premium
/// 4. score ≥ standard band → standard
/// 5. below standard
pub fn classify_category(
    score: f64,
    has_critical_defect: bool,
    bands: &CategoryBands,
) -> QualityCategory {
    if has_critical_defect && score < bands.critical_cap {
        QualityCategory::BelowStandard
    } else if score >= bands.specialty && !has_critical_defect {
        QualityCategory::Specialty
    } else if score >= bands.premium {
        QualityCategory::Premium
    } else if score >= bands.standard {
        QualityCategory::Standard
    } else {
        QualityCategory::BelowStandard
    }
}

/// How a bean's final score was reached
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreBreakdown {
    pub base: f64,
    /// Sum of all defect severities
    pub defect_penalty: f64,
    /// Positive for large beans, negative for small ones
    pub size_adjustment: f64,
    /// Clamped into [0, 100]
    pub final_score: f64,
}

/// Result of grading one bean
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GrainClassification {
    pub grain_id: u32,
    pub defects: Vec<DefectRecord>,
    pub score: f64,
    pub category: QualityCategory,
    pub size_class: SizeClass,
    pub dominant_color: ColorClass,
    pub dominant_percentage: f64,
    pub color_composition: BTreeMap<ColorClass, f64>,
    pub score_breakdown: ScoreBreakdown,
}

impl GrainClassification {
    pub fn has_critical_defect(&self) -> bool {
        self.defects.iter().any(|d| d.critical)
    }

    pub fn has_defect(&self, defect_type: DefectType) -> bool {
        self.defects.iter().any(|d| d.defect_type == defect_type)
    }
}
