//! Grading pipeline stages

pub mod aggregator;
pub mod category;
pub mod color;
pub mod defect;
pub mod engine;
pub mod scoring;
pub mod validator;

pub use aggregator::{summarize_reports, LotAggregator};
pub use category::CategoryClassifier;
pub use color::{ColorAnalysis, ColorUniformityAnalyzer};
pub use defect::DefectClassifier;
pub use engine::GradingEngine;
pub use scoring::{QualityScorer, BASE_SCORE};
pub use validator::{FeatureValidator, ValidatedBatch};
