//! Tests for the exported bindings, run on the wasm target
//! (`wasm-pack test --node wasm`)

#![cfg(target_arch = "wasm32")]

use grain_quality_wasm::{
    category_for_score, classify_grain_json, classify_lot_json, size_class_for_area,
};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

const BEAN: &str = r#"{
    "grain_id": 7,
    "bounding_box": {"x": 4, "y": 4, "width": 28, "height": 20},
    "color_composition": {"medium": 85.0, "light": 15.0},
    "area": 1100.0,
    "shape_irregularity": 0.1,
    "crack_ratio": 0.4
}"#;

fn lot(features: &str) -> String {
    format!(
        r#"{{"lot_id": "00000000-0000-0000-0000-000000000000", "features": [{}]}}"#,
        features
    )
}

fn error_message(err: JsValue) -> String {
    js_sys::Error::from(err).message().into()
}

#[wasm_bindgen_test]
fn classify_lot_json_returns_outcome() {
    let json = classify_lot_json(&lot(BEAN), None).unwrap();
    let outcome: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(outcome["report"]["total_grains"], 1);
    assert_eq!(outcome["classifications"][0]["grain_id"], 7);
    assert_eq!(outcome["classifications"][0]["category"], "premium");
}

#[wasm_bindgen_test]
fn classify_lot_json_error_lists_rejected_records() {
    let bad = BEAN.replace("\"area\": 1100.0", "\"area\": -5.0");
    let err = classify_lot_json(&lot(&bad), None).unwrap_err();

    let detail: serde_json::Value = serde_json::from_str(&error_message(err)).unwrap();
    assert_eq!(detail["code"], "NO_GRAINS_DETECTED");
    assert_eq!(detail["warnings"][0]["grain_id"], 7);
    assert_eq!(detail["warnings"][0]["rule"], "non_positive_area");
}

#[wasm_bindgen_test]
fn classify_grain_json_flags_crack() {
    let json = classify_grain_json(BEAN, None).unwrap();
    let grain: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(grain["defects"][0]["defect_type"], "cracked");
    assert_eq!(grain["defects"][0]["critical"], true);
}

#[wasm_bindgen_test]
fn classify_grain_json_rejects_bad_config() {
    let err = classify_grain_json(BEAN, Some("{not json".to_string())).unwrap_err();
    assert!(error_message(err).contains("Invalid configuration JSON"));
}

#[wasm_bindgen_test]
fn lookups_use_default_thresholds() {
    assert_eq!(category_for_score(91.0, false), "Specialty");
    assert_eq!(size_class_for_area(450.0), "Small");
}
