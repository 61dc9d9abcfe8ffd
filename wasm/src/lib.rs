//! WebAssembly module for the Stock-Order Transformation Ledger
//!
//! Provides client-side previews while an operator edits a form:
//! - Net weight and final price of a delivery
//! - Input clipping against a target quantity
//! - Transformation validation
//! - Batch history grouping
//! - Field requirements per commodity
//!
//! Structured values cross the boundary as JSON strings.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use shared::{
    clip_inputs, compute_final_price, compute_net_weight, group_timeline,
    parse_optional_quantity, parse_quantity, resolve_field_requirements,
    validate_transformation, CandidateLot, CommodityType,
    FacilityFlags, LedgerError, TimelineEntry, TransformationDraft, TransformationType,
    ValidationIssue,
};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("stock-ledger wasm ready"));
}

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_error("Serialization failed", e))
}

/// Net weight breakdown as JSON (`base_weight`, `moisture_deduction`, `net`)
#[wasm_bindgen]
pub fn calculate_net_weight(
    gross: &str,
    tare: &str,
    damaged_weight: &str,
    moisture_percent: &str,
) -> Result<String, JsValue> {
    let net_weight = compute_net_weight(
        parse_quantity(gross),
        parse_optional_quantity(tare),
        parse_optional_quantity(damaged_weight),
        parse_optional_quantity(moisture_percent),
    );
    to_json(&net_weight)
}

/// Final price, rounded to 2 decimal places
#[wasm_bindgen]
pub fn calculate_final_price(
    price_per_unit: &str,
    damaged_price_deduction: &str,
    net_weight: &str,
    final_price_discount: &str,
) -> String {
    compute_final_price(
        parse_quantity(price_per_unit),
        parse_optional_quantity(damaged_price_deduction),
        parse_quantity(net_weight),
        parse_optional_quantity(final_price_discount),
    )
    .to_string()
}

/// Clip candidate lots (JSON array) to a target quantity
#[wasm_bindgen]
pub fn clip_input_lots(
    candidates_json: &str,
    target_quantity: &str,
    already_committed: &str,
) -> Result<String, JsValue> {
    let candidates: Vec<CandidateLot> = serde_json::from_str(candidates_json)
        .map_err(|e| js_error("Invalid candidates JSON", e))?;

    let result = clip_inputs(
        &candidates,
        parse_quantity(target_quantity),
        parse_quantity(already_committed),
    );
    to_json(&result)
}

/// Validate a transformation draft; returns the list of issues, empty when valid
#[wasm_bindgen]
pub fn validate_transformation_draft(draft_json: &str) -> Result<String, JsValue> {
    let draft: TransformationDraft =
        serde_json::from_str(draft_json).map_err(|e| js_error("Invalid draft JSON", e))?;

    let issues: Vec<ValidationIssue> = match validate_transformation(&draft) {
        Ok(()) => Vec::new(),
        Err(LedgerError::Validation(errors)) => errors.issues,
        Err(err) => return Err(js_error("Validation failed", err)),
    };
    to_json(&issues)
}

/// Group sibling sub-lots in a raw timeline (JSON array)
#[wasm_bindgen]
pub fn group_batch_history(timeline_json: &str) -> Result<String, JsValue> {
    let timeline: Vec<TimelineEntry> = serde_json::from_str(timeline_json)
        .map_err(|e| js_error("Invalid timeline JSON", e))?;
    to_json(&group_timeline(timeline))
}

/// Resolve the field requirement set for a commodity, facility and type
#[wasm_bindgen]
pub fn field_requirements(
    commodity: &str,
    facility_json: &str,
    transformation_type: &str,
) -> Result<String, JsValue> {
    let commodity: CommodityType = commodity
        .parse()
        .map_err(|e| js_error("Unknown commodity", e))?;
    let transformation_type: TransformationType = transformation_type
        .parse()
        .map_err(|e| js_error("Unknown transformation type", e))?;
    let flags: FacilityFlags = if facility_json.trim().is_empty() {
        FacilityFlags::default()
    } else {
        serde_json::from_str(facility_json).map_err(|e| js_error("Invalid facility JSON", e))?
    };

    to_json(&resolve_field_requirements(commodity, &flags, transformation_type))
}
