//! Grading pipeline orchestration
//!
//! validate → (defects ∥ color/size) → score → category → aggregate.
//! The per-bean stages share nothing mutable; with the `parallel` feature
//! they run on the rayon pool. Aggregation waits for every bean.

use chrono::Utc;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use shared::{
    ClassificationConfig, GrainClassification, GrainFeature, LotClassificationOutcome,
    LotClassificationRequest,
};

use crate::config::validate_thresholds;
use crate::error::{EngineError, EngineResult};
use crate::services::{
    CategoryClassifier, ColorUniformityAnalyzer, DefectClassifier, FeatureValidator,
    LotAggregator, QualityScorer,
};

/// Grain quality classification engine for one threshold configuration
#[derive(Debug, Clone)]
pub struct GradingEngine {
    config: ClassificationConfig,
    validator: FeatureValidator,
    defect_classifier: DefectClassifier,
    color_analyzer: ColorUniformityAnalyzer,
    scorer: QualityScorer,
    category_classifier: CategoryClassifier,
}

impl GradingEngine {
    /// Create an engine, rejecting inconsistent thresholds up front
    pub fn new(config: ClassificationConfig) -> EngineResult<Self> {
        validate_thresholds(&config)?;

        Ok(Self {
            validator: FeatureValidator::new(&config.validation),
            defect_classifier: DefectClassifier::new(&config.defects, &config.severity),
            color_analyzer: ColorUniformityAnalyzer::new(&config.size),
            scorer: QualityScorer::new(&config.size),
            category_classifier: CategoryClassifier::new(&config.categories),
            config,
        })
    }

    pub fn config(&self) -> &ClassificationConfig {
        &self.config
    }

    /// Grade a single, already validated bean
    pub fn classify_grain(&self, feature: &GrainFeature) -> GrainClassification {
        let defects = self.defect_classifier.classify(feature);
        let color = self.color_analyzer.analyze(feature);
        let score_breakdown = self.scorer.score(&defects, color.size_class);
        let category = self
            .category_classifier
            .classify(score_breakdown.final_score, &defects);

        GrainClassification {
            grain_id: feature.grain_id,
            defects,
            score: score_breakdown.final_score,
            category,
            size_class: color.size_class,
            dominant_color: color.dominant_color,
            dominant_percentage: color.dominant_percentage,
            color_composition: color.color_composition,
            score_breakdown,
        }
    }

    /// Grade every bean of a lot and aggregate the report
    ///
    /// Malformed records are excluded and returned as warnings. Fails only
    /// when no record is valid.
    #[tracing::instrument(
        skip(self, request),
        fields(lot_id = %request.context.lot_id, submitted = request.features.len())
    )]
    pub fn classify_lot(
        &self,
        request: &LotClassificationRequest,
    ) -> EngineResult<LotClassificationOutcome> {
        let started = Utc::now();

        let batch = self.validator.validate(&request.features);
        if batch.is_empty() {
            tracing::error!(
                "No valid grains in lot {}: {} records submitted",
                request.context.lot_id,
                request.features.len()
            );
            return Err(EngineError::NoGrainsDetected {
                lot_id: request.context.lot_id,
                submitted: request.features.len(),
                warnings: batch.warnings,
            });
        }

        let classifications = self.classify_grains(&batch.grains);
        tracing::debug!("Classified {} grains", classifications.len());

        let mut report = LotAggregator::aggregate(&request.context, &classifications, 0)?;

        // Wall-clock from validation through aggregation
        let finished = Utc::now();
        let elapsed_ms = (finished - started).num_milliseconds().max(0) as u64;
        report.processing_time_ms = elapsed_ms;
        report.generated_at = finished;

        tracing::info!(
            total_grains = report.total_grains.get(),
            predominant = %report.predominant_category,
            warnings = batch.warnings.len(),
            "Lot graded in {} ms",
            elapsed_ms
        );

        Ok(LotClassificationOutcome {
            report,
            classifications,
            warnings: batch.warnings,
        })
    }

    #[cfg(feature = "parallel")]
    fn classify_grains(&self, grains: &[&GrainFeature]) -> Vec<GrainClassification> {
        grains
            .par_iter()
            .map(|feature| self.classify_grain(feature))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn classify_grains(&self, grains: &[&GrainFeature]) -> Vec<GrainClassification> {
        grains
            .iter()
            .map(|feature| self.classify_grain(feature))
            .collect()
    }
}
