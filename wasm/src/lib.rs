//! WebAssembly module for grain quality classification
//!
//! Provides client-side computation for:
//! - Grading a whole lot from detector features (offline capture)
//! - Grading a single bean
//! - Category and size lookups with the default thresholds

use grain_quality_engine::{ColorUniformityAnalyzer, EngineError, GradingEngine};
use shared::{classify_category, ClassificationConfig, GrainFeature, LotClassificationRequest};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&JsValue::from_str("Grain quality module initialized"));
}

/// Grade a lot; returns the outcome (report, classifications, warnings) as JSON
///
/// `config_json` overrides the default thresholds when given. When no record
/// is valid the error message is the JSON error detail, listing each rejected
/// record with the rule it broke.
#[wasm_bindgen]
pub fn classify_lot_json(request_json: &str, config_json: Option<String>) -> Result<String, JsValue> {
    classify_lot(request_json, config_json.as_deref()).map_err(to_js_error)
}

/// Grade one bean; returns its classification as JSON
#[wasm_bindgen]
pub fn classify_grain_json(feature_json: &str, config_json: Option<String>) -> Result<String, JsValue> {
    classify_grain(feature_json, config_json.as_deref()).map_err(to_js_error)
}

/// Category for a score with the default bands
#[wasm_bindgen]
pub fn category_for_score(score: f64, has_critical_defect: bool) -> String {
    let bands = ClassificationConfig::default().categories;
    format!("{}", classify_category(score, has_critical_defect, &bands))
}

/// Size class for an area with the default bounds
#[wasm_bindgen]
pub fn size_class_for_area(area: f64) -> String {
    let analyzer = ColorUniformityAnalyzer::new(&ClassificationConfig::default().size);
    format!("{}", analyzer.size_class(area))
}

fn build_engine(config_json: Option<&str>) -> Result<GradingEngine, String> {
    let config = match config_json {
        Some(json) => serde_json::from_str::<ClassificationConfig>(json)
            .map_err(|e| format!("Invalid configuration JSON: {}", e))?,
        None => ClassificationConfig::default(),
    };
    GradingEngine::new(config).map_err(|e| e.to_string())
}

fn classify_lot(request_json: &str, config_json: Option<&str>) -> Result<String, String> {
    let engine = build_engine(config_json)?;
    let request: LotClassificationRequest = serde_json::from_str(request_json)
        .map_err(|e| format!("Invalid request JSON: {}", e))?;

    let outcome = engine.classify_lot(&request).map_err(|e| match &e {
        EngineError::NoGrainsDetected { .. } => {
            serde_json::to_string(&e.detail()).unwrap_or_else(|_| e.to_string())
        }
        _ => e.to_string(),
    })?;

    #[cfg(target_arch = "wasm32")]
    if !outcome.warnings.is_empty() {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "{} feature record(s) excluded by validation",
            outcome.warnings.len()
        )));
    }

    serde_json::to_string(&outcome).map_err(|e| e.to_string())
}

fn classify_grain(feature_json: &str, config_json: Option<&str>) -> Result<String, String> {
    let engine = build_engine(config_json)?;
    let feature: GrainFeature = serde_json::from_str(feature_json)
        .map_err(|e| format!("Invalid feature JSON: {}", e))?;

    let failures = check_feature(&feature, engine.config().validation.color_sum_tolerance);
    if let Some((_, message)) = failures.first() {
        return Err(message.to_string());
    }

    serde_json::to_string(&engine.classify_grain(&feature)).map_err(|e| e.to_string())
}

fn to_js_error(message: String) -> JsValue {
    js_sys::Error::new(&message).into()
}
