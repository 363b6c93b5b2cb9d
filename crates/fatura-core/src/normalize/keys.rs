//! Recursive key normalization.

use serde_json::{Map, Value};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

/// Normalize a single mapping key.
///
/// Trims the key, turns internal spaces into underscores, strips diacritics by
/// compatibility decomposition and lowercases the result. When nothing ASCII
/// survives the decomposition, the pre-transliteration key is kept.
pub fn normalize_key(key: &str) -> String {
    let spaced = key.trim().replace(' ', "_");
    let ascii: String = spaced.nfkd().filter(char::is_ascii).collect();

    if ascii.is_empty() {
        spaced.to_lowercase()
    } else {
        ascii.to_ascii_lowercase()
    }
}

/// Rewrite every object key in `value`, recursing through arrays and objects.
///
/// When two keys collapse to the same normalized key the later value wins and
/// the key keeps its first position.
pub fn normalize_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, item) in map {
                let normalized = normalize_key(key);
                if out.insert(normalized, normalize_keys(item)).is_some() {
                    debug!("Duplicate key after normalization: {:?}", key);
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize_keys).collect()),
        scalar => scalar.clone(),
    }
}
