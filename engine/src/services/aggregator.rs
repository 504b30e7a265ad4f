//! Lot-level aggregation of per-bean results

use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use chrono::Utc;
use rust_decimal::Decimal;
use shared::{
    percentage_of, DefectStatistic, DefectType, GrainClassification, LotContext,
    LotQualityReport, QualityBreakdown, QualityCategory, QualitySummary, SizeClass,
};

use crate::error::{EngineError, EngineResult};
use crate::services::color::ColorUniformityAnalyzer;

/// Reduces a complete set of bean classifications into a lot report
pub struct LotAggregator;

impl LotAggregator {
    /// Build the report for a lot
    ///
    /// Must be given every classification of the lot; there is no incremental
    /// form. Fails with [`EngineError::NoGrainsDetected`] when empty.
    pub fn aggregate(
        context: &LotContext,
        classifications: &[GrainClassification],
        processing_time_ms: u64,
    ) -> EngineResult<LotQualityReport> {
        let Some(total_grains) = NonZeroUsize::new(classifications.len()) else {
            return Err(EngineError::NoGrainsDetected {
                lot_id: context.lot_id,
                submitted: classifications.len(),
                warnings: Vec::new(),
            });
        };
        let total = total_grains.get();

        let defect_counts: BTreeMap<DefectType, DefectStatistic> = DefectType::ALL
            .iter()
            .map(|&defect_type| {
                let count = classifications
                    .iter()
                    .filter(|c| c.has_defect(defect_type))
                    .count();
                (
                    defect_type,
                    DefectStatistic {
                        count,
                        percentage: percentage_of(count, total),
                    },
                )
            })
            .collect();

        let mut category_distribution: BTreeMap<QualityCategory, usize> =
            QualityCategory::ALL.iter().map(|&c| (c, 0)).collect();
        let mut size_distribution: BTreeMap<SizeClass, usize> =
            SizeClass::ALL.iter().map(|&s| (s, 0)).collect();
        for c in classifications {
            *category_distribution.entry(c.category).or_insert(0) += 1;
            *size_distribution.entry(c.size_class).or_insert(0) += 1;
        }

        let mean_score = classifications.iter().map(|c| c.score).sum::<f64>() / total as f64;

        let predominant_category = predominant_of(classifications, total_grains);
        let (dominant_color, uniformity_index) =
            ColorUniformityAnalyzer::uniformity_of(classifications, total_grains);

        let quality_breakdown = QualityBreakdown {
            excellent: category_distribution[&QualityCategory::Specialty]
                + category_distribution[&QualityCategory::Premium],
            good: category_distribution[&QualityCategory::Standard],
            poor: category_distribution[&QualityCategory::BelowStandard],
        };

        Ok(LotQualityReport {
            lot_id: context.lot_id,
            total_grains,
            defect_counts,
            average_score: to_decimal(mean_score),
            category_distribution,
            predominant_category,
            quality_breakdown,
            size_distribution,
            dominant_color,
            uniformity_index,
            processing_time_ms,
            image_reference: context.image_reference.clone(),
            generated_at: Utc::now(),
        })
    }

    /// Most frequent category
    ///
    /// Ties go to the category whose beans have the higher average score, then
    /// to the better category.
    pub fn predominant_category(
        classifications: &[GrainClassification],
    ) -> Option<QualityCategory> {
        NonZeroUsize::new(classifications.len())
            .map(|total| predominant_of(classifications, total))
    }
}

/// Predominant category of a non-empty set of classifications
fn predominant_of(
    classifications: &[GrainClassification],
    total: NonZeroUsize,
) -> QualityCategory {
    debug_assert_eq!(classifications.len(), total.get());

    // category → (count, score sum)
    let mut stats: BTreeMap<QualityCategory, (usize, f64)> = BTreeMap::new();
    for c in classifications {
        let entry = stats.entry(c.category).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += c.score;
    }

    let seed = classifications[0].category;
    let (seed_count, seed_sum) = stats[&seed];
    let mut best = (seed, seed_count, seed_sum / seed_count as f64);
    for (category, (count, sum)) in stats {
        let average = sum / count as f64;
        let wins = count
            .cmp(&best.1)
            .then(average.total_cmp(&best.2))
            .then(category.rank().cmp(&best.0.rank()))
            .is_gt();
        if wins {
            best = (category, count, average);
        }
    }
    best.0
}

/// Grain-weighted average quality across several lot reports
pub fn summarize_reports(reports: &[LotQualityReport]) -> Option<QualitySummary> {
    let total_grains: usize = reports.iter().map(|r| r.total_grains.get()).sum();
    if total_grains == 0 {
        return None;
    }

    let weighted: Decimal = reports
        .iter()
        .map(|r| r.average_score * Decimal::from(r.total_grains.get() as u64))
        .sum();

    Some(QualitySummary {
        total_lots: reports.len(),
        total_grains,
        average_score: (weighted / Decimal::from(total_grains as u64)).round_dp(2),
    })
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64_retain(value)
        .unwrap_or_default()
        .round_dp(2)
}
