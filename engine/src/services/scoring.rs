//! Per-bean quality score

use shared::{DefectRecord, ScoreBreakdown, SizeBounds, SizeClass};

use crate::services::color::size_adjustment;

/// Every bean starts from a perfect score
pub const BASE_SCORE: f64 = 100.0;

/// Turns defects and size into a bounded score
#[derive(Debug, Clone)]
pub struct QualityScorer {
    size: SizeBounds,
}

impl QualityScorer {
    pub fn new(size: &SizeBounds) -> Self {
        Self { size: size.clone() }
    }

    /// Base score minus every defect severity, plus the size adjustment,
    /// clamped into [0, 100]
    pub fn score(&self, defects: &[DefectRecord], size_class: SizeClass) -> ScoreBreakdown {
        let defect_penalty: f64 = defects.iter().map(|d| d.severity).sum();
        let size_adjustment = size_adjustment(&self.size, size_class);
        let final_score = (BASE_SCORE - defect_penalty + size_adjustment).clamp(0.0, 100.0);

        ScoreBreakdown {
            base: BASE_SCORE,
            defect_penalty,
            size_adjustment,
            final_score,
        }
    }
}
