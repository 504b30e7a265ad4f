//! Lot-level quality report models

use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ColorClass, DefectType, QualityCategory, SizeClass};

/// Number of beans carrying a defect type, and their share of the lot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DefectStatistic {
    pub count: usize,
    /// Percentage of total grains (0-100)
    pub percentage: Decimal,
}

/// Coarse quality tiers over the category distribution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct QualityBreakdown {
    /// Specialty + Premium
    pub excellent: usize,
    /// Standard
    pub good: usize,
    /// Below Standard
    pub poor: usize,
}

/// Aggregated quality of one lot
///
/// `total_grains` is non-zero: a lot with no valid grains fails instead of
/// producing a report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LotQualityReport {
    pub lot_id: Uuid,
    pub total_grains: NonZeroUsize,
    /// Every defect type, zero-filled
    pub defect_counts: BTreeMap<DefectType, DefectStatistic>,
    pub average_score: Decimal,
    /// Every category, zero-filled
    pub category_distribution: BTreeMap<QualityCategory, usize>,
    pub predominant_category: QualityCategory,
    pub quality_breakdown: QualityBreakdown,
    /// Every size class, zero-filled
    pub size_distribution: BTreeMap<SizeClass, usize>,
    /// Color class most often dominant across the lot's beans
    pub dominant_color: ColorClass,
    /// 1 / (1 + stdev) of the dominant color percentage, in (0, 1]
    pub uniformity_index: f64,
    pub processing_time_ms: u64,
    /// Opaque handle supplied by the caller
    pub image_reference: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl LotQualityReport {
    pub fn category_count(&self, category: QualityCategory) -> usize {
        self.category_distribution
            .get(&category)
            .copied()
            .unwrap_or(0)
    }

    /// Share of the lot in a category (0-100, two decimals)
    pub fn category_percentage(&self, category: QualityCategory) -> Decimal {
        percentage_of(self.category_count(category), self.total_grains.get())
    }

    pub fn defect_count(&self, defect_type: DefectType) -> usize {
        self.defect_counts
            .get(&defect_type)
            .map(|s| s.count)
            .unwrap_or(0)
    }
}

/// Average quality across several lots, weighted by grain count
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualitySummary {
    pub total_lots: usize,
    pub total_grains: usize,
    pub average_score: Decimal,
}

/// `part / whole` as a percentage rounded to two decimals
pub fn percentage_of(part: usize, whole: usize) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(part as u64) * Decimal::from(100) / Decimal::from(whole as u64)).round_dp(2)
}
