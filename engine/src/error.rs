//! Error handling for the grain quality engine
//!
//! Hard failures abort a whole lot. Soft, per-record problems are not errors:
//! they travel as [`shared::FeatureValidationWarning`] values next to the
//! results.

use serde::Serialize;
use shared::FeatureValidationWarning;
use thiserror::Error;
use uuid::Uuid;

/// Engine error types
#[derive(Error, Debug)]
pub enum EngineError {
    /// No feature record survived validation
    #[error("No grains detected in lot {lot_id}: {submitted} records submitted, none valid")]
    NoGrainsDetected {
        lot_id: Uuid,
        submitted: usize,
        /// Why each submitted record was rejected
        warnings: Vec<FeatureValidationWarning>,
    },

    /// Thresholds are out of range or inconsistent with each other
    #[error("Configuration error in {rule}: {message}")]
    Configuration { rule: String, message: String },

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(#[from] config::ConfigError),
}

/// Error payload for surfacing a failure to users
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_th: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Rejected records and the rule each one broke
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<FeatureValidationWarning>,
}

impl EngineError {
    pub fn configuration(rule: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Configuration {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::NoGrainsDetected { .. } => "NO_GRAINS_DETECTED",
            EngineError::Configuration { .. } => "CONFIGURATION_ERROR",
            EngineError::ConfigLoad(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Bilingual description for the calling service
    pub fn detail(&self) -> ErrorDetail {
        match self {
            EngineError::NoGrainsDetected {
                submitted,
                warnings,
                ..
            } => ErrorDetail {
                code: self.code().to_string(),
                message_en: format!(
                    "No valid coffee beans detected ({} records submitted)",
                    submitted
                ),
                message_th: format!(
                    "ไม่พบเมล็ดกาแฟที่ถูกต้อง (ส่งข้อมูล {} รายการ)",
                    submitted
                ),
                field: Some("features".to_string()),
                warnings: warnings.clone(),
            },
            EngineError::Configuration { rule, message } => ErrorDetail {
                code: self.code().to_string(),
                message_en: format!("Configuration error: {}", message),
                message_th: format!("เกิดข้อผิดพลาดในการตั้งค่า: {}", message),
                field: Some(rule.clone()),
                warnings: Vec::new(),
            },
            EngineError::ConfigLoad(e) => ErrorDetail {
                code: self.code().to_string(),
                message_en: format!("Configuration error: {}", e),
                message_th: format!("เกิดข้อผิดพลาดในการตั้งค่า: {}", e),
                field: None,
                warnings: Vec::new(),
            },
        }
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
