//! Quality category assignment

use shared::{classify_category, CategoryBands, DefectRecord, QualityCategory};

/// Maps a score and defect profile to a category
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    bands: CategoryBands,
}

impl CategoryClassifier {
    pub fn new(bands: &CategoryBands) -> Self {
        Self {
            bands: bands.clone(),
        }
    }

    /// Only the presence of a critical defect matters, not how many
    pub fn classify(&self, score: f64, defects: &[DefectRecord]) -> QualityCategory {
        let has_critical = defects.iter().any(|d| d.critical);
        classify_category(score, has_critical, &self.bands)
    }
}
