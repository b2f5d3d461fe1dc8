//! WASM bindings for filter-engine.
//!
//! Exposes visible-field resolution, state transitions and query
//! normalization over the built-in categories to JavaScript via
//! `wasm-bindgen`. States, transitions and results cross the boundary as JSON
//! strings in the same camelCase shape the Rust types serialize to.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p filter-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/filter-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/filter_engine_wasm.wasm
//! ```

use std::sync::OnceLock;

use filter_engine::{
    FieldKind, FieldOption, FieldValue, FilterEngine, FilterState, Transition,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VisibleFieldDto<'a> {
    key: &'a str,
    kind: FieldKind,
    options: &'a [FieldOption],
    value: Option<&'a FieldValue>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

static ENGINE: OnceLock<Result<FilterEngine, String>> = OnceLock::new();

/// The shared engine over the built-in categories, built on first use.
fn engine() -> Result<&'static FilterEngine, JsValue> {
    ENGINE
        .get_or_init(|| FilterEngine::builtin().map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| JsValue::from_str(&format!("Built-in registry is invalid: {}", e)))
}

fn parse_state(json: &str) -> Result<FilterState, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid state JSON: {}", e)))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Names of the built-in categories, as a JSON array of strings.
#[wasm_bindgen(js_name = "categories")]
pub fn categories() -> Result<String, JsValue> {
    to_json(&engine()?.registry().categories())
}

/// The filter schema of one category, as JSON.
///
/// An unknown category yields the empty schema, which has no fields.
#[wasm_bindgen(js_name = "categorySchema")]
pub fn category_schema(category: &str) -> Result<String, JsValue> {
    to_json(engine()?.registry().resolve(Some(category)))
}

/// Fields the UI should render for a state.
///
/// Returns a JSON array of `{key, kind, options, value}` objects in
/// declaration order, where `options` are the options offered right now and
/// `value` is the stored answer (or `null`).
#[wasm_bindgen(js_name = "visibleFields")]
pub fn visible_fields(state_json: &str) -> Result<String, JsValue> {
    let engine = engine()?;
    let state = parse_state(state_json)?;

    let fields = engine.visible_fields(&state);
    let dtos: Vec<VisibleFieldDto> = fields
        .iter()
        .map(|f| VisibleFieldDto {
            key: f.key(),
            kind: f.field.kind,
            options: &f.effective_options,
            value: state.category_value(f.key()),
        })
        .collect();

    to_json(&dtos)
}

/// Apply one transition (e.g. `{"type":"setCategoryField","key":"brand","value":"bmw"}`)
/// and return the next state as JSON.
#[wasm_bindgen(js_name = "applyTransition")]
pub fn apply_transition(state_json: &str, transition_json: &str) -> Result<String, JsValue> {
    let engine = engine()?;
    let state = parse_state(state_json)?;
    let transition: Transition = serde_json::from_str(transition_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid transition JSON: {}", e)))?;

    to_json(&engine.apply(&state, &transition))
}

/// Apply a JSON array of transitions in order and return the final state.
#[wasm_bindgen(js_name = "applyTransitions")]
pub fn apply_transitions(state_json: &str, transitions_json: &str) -> Result<String, JsValue> {
    let engine = engine()?;
    let state = parse_state(state_json)?;
    let transitions: Vec<Transition> = serde_json::from_str(transitions_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid transitions JSON: {}", e)))?;

    to_json(&engine.apply_all(&state, &transitions))
}

/// Normalize a state into the query descriptor JSON sent to the search backend.
#[wasm_bindgen(js_name = "normalizeState")]
pub fn normalize_state(state_json: &str) -> Result<String, JsValue> {
    let state = parse_state(state_json)?;
    Ok(engine()?.normalize(&state).to_json())
}

/// Normalize a state into a URL query string.
#[wasm_bindgen(js_name = "toQueryString")]
pub fn to_query_string(state_json: &str) -> Result<String, JsValue> {
    let state = parse_state(state_json)?;
    Ok(engine()?.normalize(&state).to_query_string())
}
