//! Color composition, size classification and lot uniformity

use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use shared::{ColorClass, GrainClassification, GrainFeature, SizeBounds, SizeClass};

/// Per-bean color and size analysis
#[derive(Debug, Clone, PartialEq)]
pub struct ColorAnalysis {
    pub dominant_color: ColorClass,
    pub dominant_percentage: f64,
    pub color_composition: BTreeMap<ColorClass, f64>,
    pub size_class: SizeClass,
    /// Score points added (large) or removed (small)
    pub size_adjustment: f64,
}

/// Analyzes bean color and size
#[derive(Debug, Clone)]
pub struct ColorUniformityAnalyzer {
    size: SizeBounds,
}

impl ColorUniformityAnalyzer {
    pub fn new(size: &SizeBounds) -> Self {
        Self { size: size.clone() }
    }

    pub fn analyze(&self, feature: &GrainFeature) -> ColorAnalysis {
        let (dominant_color, dominant_percentage) = feature.dominant_color();
        let size_class = self.size_class(feature.area);

        ColorAnalysis {
            dominant_color,
            dominant_percentage,
            color_composition: feature.color_composition.clone(),
            size_class,
            size_adjustment: self.size_adjustment(size_class),
        }
    }

    /// Bucket an area: below `small_max` is small, above `large_min` is large
    pub fn size_class(&self, area: f64) -> SizeClass {
        if area < self.size.small_max {
            SizeClass::Small
        } else if area > self.size.large_min {
            SizeClass::Large
        } else {
            SizeClass::Standard
        }
    }

    pub fn size_adjustment(&self, size_class: SizeClass) -> f64 {
        size_adjustment(&self.size, size_class)
    }

    /// Lot dominant color and the uniformity of its percentage across beans
    ///
    /// Returns `None` for no beans; see [`Self::uniformity_of`].
    pub fn uniformity_index(
        classifications: &[GrainClassification],
    ) -> Option<(ColorClass, f64)> {
        NonZeroUsize::new(classifications.len())
            .map(|total| Self::uniformity_of(classifications, total))
    }

    /// Uniformity of a non-empty set of beans
    ///
    /// The lot dominant color is the class most often dominant per bean (ties
    /// go to [`ColorClass`] declaration order). Uniformity is
    /// `1 / (1 + σ)` where σ is the population standard deviation of that
    /// class's percentage over every bean.
    pub fn uniformity_of(
        classifications: &[GrainClassification],
        total: NonZeroUsize,
    ) -> (ColorClass, f64) {
        debug_assert_eq!(classifications.len(), total.get());

        let mut dominant_counts: BTreeMap<ColorClass, usize> = BTreeMap::new();
        for c in classifications {
            *dominant_counts.entry(c.dominant_color).or_insert(0) += 1;
        }
        let seed = classifications[0].dominant_color;
        let (lot_color, _) = dominant_counts.iter().fold(
            (seed, dominant_counts[&seed]),
            |(best, best_count), (&color, &count)| {
                if count > best_count || (count == best_count && color < best) {
                    (color, count)
                } else {
                    (best, best_count)
                }
            },
        );

        let n = total.get() as f64;
        let percentages: Vec<f64> = classifications
            .iter()
            .map(|c| c.color_composition.get(&lot_color).copied().unwrap_or(0.0))
            .collect();
        let mean = percentages.iter().sum::<f64>() / n;
        let variance = percentages.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;

        (lot_color, 1.0 / (1.0 + variance.sqrt()))
    }
}

/// Fixed score adjustment for a size class
pub fn size_adjustment(size: &SizeBounds, size_class: SizeClass) -> f64 {
    match size_class {
        SizeClass::Large => size.large_bonus,
        SizeClass::Small => -size.small_penalty,
        SizeClass::Standard => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_class_bounds_are_strict() {
        let analyzer = ColorUniformityAnalyzer::new(&SizeBounds::default());
        assert_eq!(analyzer.size_class(499.9), SizeClass::Small);
        assert_eq!(analyzer.size_class(500.0), SizeClass::Standard);
        assert_eq!(analyzer.size_class(2000.0), SizeClass::Standard);
        assert_eq!(analyzer.size_class(2000.1), SizeClass::Large);
    }

    #[test]
    fn test_size_adjustment_signs() {
        let analyzer = ColorUniformityAnalyzer::new(&SizeBounds::default());
        assert_eq!(analyzer.size_adjustment(SizeClass::Large), 2.0);
        assert_eq!(analyzer.size_adjustment(SizeClass::Small), -3.0);
        assert_eq!(analyzer.size_adjustment(SizeClass::Standard), 0.0);
    }

    #[test]
    fn test_uniformity_index_empty_and_non_empty() {
        use crate::services::GradingEngine;
        use shared::{BoundingBox, ClassificationConfig};

        assert!(ColorUniformityAnalyzer::uniformity_index(&[]).is_none());

        let engine = GradingEngine::new(ClassificationConfig::default()).unwrap();
        let grains: Vec<_> = [70.0, 80.0]
            .iter()
            .enumerate()
            .map(|(i, &dark)| {
                engine.classify_grain(&GrainFeature {
                    grain_id: i as u32,
                    bounding_box: BoundingBox {
                        x: 0,
                        y: 0,
                        width: 10,
                        height: 10,
                    },
                    color_composition: [(ColorClass::Dark, dark), (ColorClass::Medium, 100.0 - dark)]
                        .into_iter()
                        .collect(),
                    area: 1000.0,
                    shape_irregularity: 0.0,
                    crack_ratio: 0.0,
                })
            })
            .collect();

        // Dark at 70 and 80: σ = 5
        let (color, index) = ColorUniformityAnalyzer::uniformity_index(&grains).unwrap();
        assert_eq!(color, ColorClass::Dark);
        assert!((index - 1.0 / 6.0).abs() < 1e-12);
    }
}
