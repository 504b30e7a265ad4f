//! Per-bean defect detection
//!
//! Every rule is evaluated on every bean, so one bean can carry several
//! defects. Comparisons are strict: a measurement exactly at its threshold is
//! not a defect.

use shared::{ColorClass, DefectRecord, DefectThresholds, DefectType, GrainFeature, SeverityWeights};

/// Flags defects from a bean's features
#[derive(Debug, Clone)]
pub struct DefectClassifier {
    thresholds: DefectThresholds,
    severity: SeverityWeights,
}

impl DefectClassifier {
    pub fn new(thresholds: &DefectThresholds, severity: &SeverityWeights) -> Self {
        Self {
            thresholds: thresholds.clone(),
            severity: severity.clone(),
        }
    }

    /// All defects present on a bean, in [`DefectType`] order
    pub fn classify(&self, feature: &GrainFeature) -> Vec<DefectRecord> {
        let mut defects = Vec::new();

        if feature.crack_ratio > self.thresholds.crack_threshold {
            defects.push(record(
                feature,
                DefectType::Cracked,
                self.crack_severity(feature.crack_ratio),
            ));
        }

        if feature.percentage(ColorClass::Dark) > self.thresholds.dark_threshold {
            defects.push(record(feature, DefectType::DarkDefective, self.severity.dark));
        }

        if feature.percentage(ColorClass::Green) > self.thresholds.green_threshold {
            defects.push(record(feature, DefectType::ImmatureGreen, self.severity.green));
        }

        if feature.shape_irregularity > self.thresholds.shape_threshold {
            defects.push(record(feature, DefectType::IrregularShape, self.severity.shape));
        }

        if !defects.is_empty() {
            tracing::trace!(
                grain_id = feature.grain_id,
                "Flagged {} defect(s)",
                defects.len()
            );
        }

        defects
    }

    /// Crack severity grows linearly with the excess over the threshold,
    /// capped at `crack_max`
    pub fn crack_severity(&self, crack_ratio: f64) -> f64 {
        let excess = (crack_ratio - self.thresholds.crack_threshold).max(0.0);
        (self.severity.crack_base + self.severity.crack_per_unit_excess * excess)
            .min(self.severity.crack_max)
    }
}

fn record(feature: &GrainFeature, defect_type: DefectType, severity: f64) -> DefectRecord {
    DefectRecord {
        grain_id: feature.grain_id,
        defect_type,
        severity,
        critical: defect_type.is_critical(),
    }
}
