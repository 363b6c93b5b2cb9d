//! WASM bindings for invoice payload normalization.
//!
//! Payloads cross the boundary as plain JS objects; maps are emitted as
//! objects rather than `Map` instances. Integers are emitted as `BigInt` so
//! saturated amounts outside the safe JS integer range still convert.

use serde::Serialize;
use serde_json::Value;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

use fatura_core::normalize::{self, PayloadSanitizer};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn from_js(value: JsValue) -> Result<Value, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible().serialize_large_number_types_as_bigints(true))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Sanitize a raw extraction payload into the canonical invoice shape.
///
/// Never fails for decodable input.
#[wasm_bindgen]
pub fn normalize_payload(payload: JsValue) -> Result<JsValue, JsValue> {
    let raw = from_js(payload)?;
    to_js(&normalize::normalize_payload(&raw))
}

/// Strictly validate a canonical payload; throws with the offending field.
#[wasm_bindgen]
pub fn build_record(payload: JsValue) -> Result<JsValue, JsValue> {
    let value = from_js(payload)?;
    let map = value
        .as_object()
        .ok_or_else(|| JsValue::from_str("payload must be an object"))?;

    let invoice = normalize::build_record(map).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&invoice)
}

/// Assert the exact canonical contract; throws a description of the first violation.
#[wasm_bindgen]
pub fn assert_payload_contract(payload: JsValue) -> Result<(), JsValue> {
    let value = from_js(payload)?;
    normalize::assert_payload_contract(&value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Coerce a scalar (number, string, boolean, null) into minor units.
#[wasm_bindgen]
pub fn to_int(value: JsValue) -> Result<i64, JsValue> {
    Ok(normalize::to_int(&from_js(value)?))
}

/// Normalize a single object key.
#[wasm_bindgen]
pub fn normalize_key(key: &str) -> String {
    normalize::normalize_key(key)
}

/// Repair UTF-8 text that was decoded as Latin-1.
#[wasm_bindgen]
pub fn repair_mojibake(text: &str) -> String {
    normalize::repair_mojibake(text)
}

/// Sanitizer class for browser use.
#[wasm_bindgen]
pub struct Sanitizer {
    inner: PayloadSanitizer,
}

#[wasm_bindgen]
impl Sanitizer {
    /// Create a sanitizer with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: PayloadSanitizer::new(),
        }
    }

    /// Configure mojibake repair.
    #[wasm_bindgen]
    pub fn set_repair_mojibake(&mut self, repair: bool) {
        self.inner = self.inner.clone().with_mojibake_repair(repair);
    }

    /// Sanitize a payload.
    #[wasm_bindgen]
    pub fn sanitize(&self, payload: JsValue) -> Result<JsValue, JsValue> {
        let raw = from_js(payload)?;
        to_js(&self.inner.sanitize(&raw))
    }

    /// Sanitize a payload and report consistency issues alongside it.
    #[wasm_bindgen]
    pub fn sanitize_with_issues(&self, payload: JsValue) -> Result<JsValue, JsValue> {
        let raw = from_js(payload)?;
        let invoice = self.inner.sanitize(&raw);

        #[derive(Serialize)]
        struct SanitizeResult {
            issues: Vec<String>,
            invoice: fatura_core::Invoice,
        }

        let output = SanitizeResult {
            issues: invoice.validate(),
            invoice,
        };

        to_js(&output)
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}
