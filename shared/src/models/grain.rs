//! Per-bean feature records produced by the external detector

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Color classes emitted by the bean color model
///
/// Declaration order is also the tie-break order when two classes share the
/// highest percentage in a bean.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ColorClass {
    Light,
    Medium,
    Dark,
    Green,
}

impl ColorClass {
    pub const ALL: [ColorClass; 4] = [
        ColorClass::Light,
        ColorClass::Medium,
        ColorClass::Dark,
        ColorClass::Green,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorClass::Light => "light",
            ColorClass::Medium => "medium",
            ColorClass::Dark => "dark",
            ColorClass::Green => "green",
        }
    }
}

impl std::fmt::Display for ColorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorClass::Light => write!(f, "Light"),
            ColorClass::Medium => write!(f, "Medium"),
            ColorClass::Dark => write!(f, "Dark"),
            ColorClass::Green => write!(f, "Green"),
        }
    }
}

/// Bounding region of a bean in the source image (pixels)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// One detected bean as measured by the detector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GrainFeature {
    /// Unique within a lot-processing session
    pub grain_id: u32,
    pub bounding_box: BoundingBox,
    /// Color class → percentage, expected to sum to 100
    pub color_composition: BTreeMap<ColorClass, f64>,
    /// Calibrated area
    pub area: f64,
    /// 0 (regular) to 1 (highly irregular)
    pub shape_irregularity: f64,
    /// Cracked surface fraction, 0 to 1
    pub crack_ratio: f64,
}

impl GrainFeature {
    /// Percentage for a color class; classes the detector omitted count as 0
    pub fn percentage(&self, color: ColorClass) -> f64 {
        self.color_composition.get(&color).copied().unwrap_or(0.0)
    }

    /// Sum of all color percentages
    pub fn composition_total(&self) -> f64 {
        self.color_composition.values().sum()
    }

    /// Highest-percentage color class and its percentage
    pub fn dominant_color(&self) -> (ColorClass, f64) {
        ColorClass::ALL
            .iter()
            .map(|&color| (color, self.percentage(color)))
            .fold((ColorClass::Light, f64::NEG_INFINITY), |best, candidate| {
                if candidate.1 > best.1 {
                    candidate
                } else {
                    best
                }
            })
    }
}
