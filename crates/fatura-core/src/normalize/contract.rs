//! Exact canonical contract check.
//!
//! Stricter than [`build_record`](super::build_record): every object must carry
//! exactly the canonical keys, and every scalar slot must already have its
//! canonical type. Sanitizer output always passes.

use serde_json::{Map, Value};

use crate::error::ContractError;
use crate::models::schema::{FieldKind, ITEM_FIELDS, PARTY_FIELDS, ROOT_FIELDS, TAX_FIELDS};

/// Assert that `payload` has exactly the canonical shape.
pub fn assert_payload_contract(payload: &Value) -> Result<(), ContractError> {
    check_object(payload, "payload", ROOT_FIELDS)
}

fn check_object(
    value: &Value,
    path: &str,
    fields: &[(&str, FieldKind)],
) -> Result<(), ContractError> {
    let map = value.as_object().ok_or_else(|| ContractError::NotAnObject {
        path: path.to_string(),
    })?;
    check_keys(map, path, fields)?;

    for (name, kind) in fields {
        let field_path = if path == "payload" {
            (*name).to_string()
        } else {
            format!("{}.{}", path, name)
        };
        check_field(&map[*name], &field_path, *kind)?;
    }

    Ok(())
}

fn check_keys(
    map: &Map<String, Value>,
    path: &str,
    fields: &[(&str, FieldKind)],
) -> Result<(), ContractError> {
    let mut expected: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    let mut found: Vec<&str> = map.keys().map(String::as_str).collect();
    expected.sort_unstable();
    found.sort_unstable();

    if expected == found {
        Ok(())
    } else {
        Err(ContractError::Keys {
            path: path.to_string(),
            expected: expected.join(", "),
            found: found.join(", "),
        })
    }
}

fn check_field(value: &Value, path: &str, kind: FieldKind) -> Result<(), ContractError> {
    let type_error = || ContractError::Type {
        path: path.to_string(),
        expected: kind.type_name(),
    };

    match kind {
        FieldKind::Text => value.is_string().then_some(()).ok_or_else(type_error),
        FieldKind::Integer => value.is_i64().then_some(()).ok_or_else(type_error),
        FieldKind::Party => check_object(value, path, PARTY_FIELDS),
        FieldKind::Items => check_elements(value, path, ITEM_FIELDS),
        FieldKind::Taxes => check_elements(value, path, TAX_FIELDS),
    }
}

fn check_elements(
    value: &Value,
    path: &str,
    fields: &[(&str, FieldKind)],
) -> Result<(), ContractError> {
    let elements = value.as_array().ok_or_else(|| ContractError::NotAnArray {
        path: path.to_string(),
    })?;

    elements.iter().enumerate().try_for_each(|(index, element)| {
        check_object(element, &format!("{}[{}]", path, index), fields)
    })
}
