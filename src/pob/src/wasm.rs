//! WebAssembly bindings for pob
//!
//! JavaScript-friendly wrappers around the import pipeline and trade URLs.

use crate::code;
use crate::import::import;
use crate::trade::{build_query, search_url, ModSelection, QueryOptions};
use wasm_bindgen::prelude::*;

/// Fast pre-check of an export code, without decoding it
#[wasm_bindgen(js_name = isValidCode)]
pub fn is_valid_code(code: &str) -> bool {
    code::is_valid(code)
}

/// Decode an export code
///
/// # Returns
/// The build (metadata and items) as a JSON string
#[wasm_bindgen(js_name = decodeBuild)]
pub fn decode_build(code: &str) -> Result<String, JsValue> {
    let build = import(code).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&build)
        .map_err(|e| JsValue::from_str(&format!("Serialize failed: {}", e)))
}

/// Trade search URL for one item of a build
///
/// Every modifier with a known stat id is included in the search.
///
/// # Arguments
/// * `code` - Export code
/// * `item_id` - The item's id attribute in the build
/// * `league` - Trade league name
#[wasm_bindgen(js_name = tradeUrl)]
pub fn trade_url(code: &str, item_id: u32, league: &str) -> Result<String, JsValue> {
    let build = import(code).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let item = build
        .item(item_id)
        .ok_or_else(|| JsValue::from_str(&format!("No item with id {}", item_id)))?;

    let options = QueryOptions {
        mods: ModSelection::searchable(item),
        ..QueryOptions::default()
    };
    search_url(&build_query(item, &options), league)
        .map_err(|e| JsValue::from_str(&format!("Serialize failed: {}", e)))
}
