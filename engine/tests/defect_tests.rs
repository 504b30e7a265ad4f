//! Defect classification tests
//!
//! Thresholds are strict: a measurement equal to its threshold is not a
//! defect, anything above it is.

use grain_quality_engine::DefectClassifier;
use proptest::prelude::*;
use shared::{
    BoundingBox, ColorClass, DefectThresholds, DefectType, GrainFeature, SeverityWeights,
};

fn feature(composition: &[(ColorClass, f64)], shape: f64, crack: f64) -> GrainFeature {
    GrainFeature {
        grain_id: 1,
        bounding_box: BoundingBox {
            x: 0,
            y: 0,
            width: 30,
            height: 22,
        },
        color_composition: composition.iter().copied().collect(),
        area: 1200.0,
        shape_irregularity: shape,
        crack_ratio: crack,
    }
}

fn clean_colors() -> Vec<(ColorClass, f64)> {
    vec![(ColorClass::Medium, 90.0), (ColorClass::Light, 10.0)]
}

fn classifier() -> DefectClassifier {
    DefectClassifier::new(&DefectThresholds::default(), &SeverityWeights::default())
}

fn defect_types(classifier: &DefectClassifier, f: &GrainFeature) -> Vec<DefectType> {
    classifier.classify(f).iter().map(|d| d.defect_type).collect()
}

// =============================================================================
// Threshold Boundaries
// =============================================================================

mod threshold_boundaries {
    use super::*;

    #[test]
    fn clean_bean_has_no_defects() {
        let f = feature(&clean_colors(), 0.1, 0.05);
        assert!(classifier().classify(&f).is_empty());
    }

    #[test]
    fn crack_exactly_at_threshold_not_flagged() {
        let f = feature(&clean_colors(), 0.1, 0.30);
        assert!(defect_types(&classifier(), &f).is_empty());
    }

    #[test]
    fn crack_just_above_threshold_flagged() {
        let f = feature(&clean_colors(), 0.1, 0.30 + 1e-9);
        assert_eq!(defect_types(&classifier(), &f), vec![DefectType::Cracked]);
    }

    #[test]
    fn dark_exactly_at_threshold_not_flagged() {
        let f = feature(&[(ColorClass::Medium, 75.0), (ColorClass::Dark, 25.0)], 0.1, 0.0);
        assert!(defect_types(&classifier(), &f).is_empty());
    }

    #[test]
    fn dark_above_threshold_flagged() {
        let f = feature(&[(ColorClass::Medium, 74.0), (ColorClass::Dark, 26.0)], 0.1, 0.0);
        assert_eq!(defect_types(&classifier(), &f), vec![DefectType::DarkDefective]);
    }

    #[test]
    fn green_exactly_at_threshold_not_flagged() {
        let f = feature(&[(ColorClass::Medium, 70.0), (ColorClass::Green, 30.0)], 0.1, 0.0);
        assert!(defect_types(&classifier(), &f).is_empty());
    }

    #[test]
    fn green_above_threshold_flagged() {
        let f = feature(&[(ColorClass::Medium, 60.0), (ColorClass::Green, 40.0)], 0.1, 0.0);
        assert_eq!(defect_types(&classifier(), &f), vec![DefectType::ImmatureGreen]);
    }

    #[test]
    fn shape_exactly_at_threshold_not_flagged() {
        let f = feature(&clean_colors(), 0.30, 0.0);
        assert!(defect_types(&classifier(), &f).is_empty());
    }

    #[test]
    fn custom_threshold_moves_boundary() {
        let thresholds = DefectThresholds {
            crack_threshold: 0.1,
            ..DefectThresholds::default()
        };
        let c = DefectClassifier::new(&thresholds, &SeverityWeights::default());
        let f = feature(&clean_colors(), 0.1, 0.15);
        assert_eq!(defect_types(&c, &f), vec![DefectType::Cracked]);
        assert!(defect_types(&classifier(), &f).is_empty());
    }
}

// =============================================================================
// Defect Records
// =============================================================================

mod defect_records {
    use super::*;

    #[test]
    fn defects_accumulate_without_early_exit() {
        let f = feature(
            &[
                (ColorClass::Medium, 20.0),
                (ColorClass::Dark, 40.0),
                (ColorClass::Green, 40.0),
            ],
            0.8,
            0.5,
        );
        assert_eq!(
            defect_types(&classifier(), &f),
            vec![
                DefectType::Cracked,
                DefectType::DarkDefective,
                DefectType::ImmatureGreen,
                DefectType::IrregularShape,
            ]
        );
    }

    #[test]
    fn critical_flags_follow_defect_type() {
        let f = feature(&[(ColorClass::Medium, 60.0), (ColorClass::Dark, 40.0)], 0.9, 0.0);
        let defects = classifier().classify(&f);

        let dark = defects
            .iter()
            .find(|d| d.defect_type == DefectType::DarkDefective)
            .unwrap();
        assert!(dark.critical);

        let shape = defects
            .iter()
            .find(|d| d.defect_type == DefectType::IrregularShape)
            .unwrap();
        assert!(!shape.critical);
    }

    #[test]
    fn records_carry_grain_id_and_configured_severity() {
        let mut f = feature(&[(ColorClass::Medium, 50.0), (ColorClass::Green, 50.0)], 0.5, 0.0);
        f.grain_id = 42;
        let defects = classifier().classify(&f);
        let weights = SeverityWeights::default();

        assert!(defects.iter().all(|d| d.grain_id == 42));
        assert_eq!(defects[0].defect_type, DefectType::ImmatureGreen);
        assert_eq!(defects[0].severity, weights.green);
        assert_eq!(defects[1].defect_type, DefectType::IrregularShape);
        assert_eq!(defects[1].severity, weights.shape);
    }

    #[test]
    fn crack_severity_scales_with_excess() {
        let c = classifier();
        let mild = c.classify(&feature(&clean_colors(), 0.1, 0.35));
        let severe = c.classify(&feature(&clean_colors(), 0.1, 0.55));
        assert!(severe[0].severity > mild[0].severity);
        assert!((mild[0].severity - 12.5).abs() < 1e-9);
    }

    #[test]
    fn crack_severity_capped() {
        let c = classifier();
        let defects = c.classify(&feature(&clean_colors(), 0.1, 1.0));
        assert_eq!(defects[0].severity, SeverityWeights::default().crack_max);
    }
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Crack severity always lies between the base weight and the cap
    #[test]
    fn prop_crack_severity_bounded(crack in 0.0f64..=1.0) {
        let weights = SeverityWeights::default();
        let defects = classifier().classify(&feature(&clean_colors(), 0.1, crack));

        for d in defects.iter().filter(|d| d.defect_type == DefectType::Cracked) {
            prop_assert!(d.severity >= weights.crack_base);
            prop_assert!(d.severity <= weights.crack_max);
        }
    }

    /// Flagging is exactly the strict comparison against the threshold
    #[test]
    fn prop_crack_flag_matches_strict_comparison(crack in 0.0f64..=1.0) {
        let flagged = defect_types(&classifier(), &feature(&clean_colors(), 0.1, crack))
            .contains(&DefectType::Cracked);
        prop_assert_eq!(flagged, crack > DefectThresholds::default().crack_threshold);
    }
}
