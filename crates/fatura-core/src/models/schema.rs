//! Canonical field table.
//!
//! Every canonical field is listed here with its kind, and every kind has one
//! documented default used on absence or type mismatch.

use serde_json::{json, Map, Value};

/// Shape of a canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Trimmed string, default `""`.
    Text,
    /// Signed integer, default `0`.
    Integer,
    /// Party object, default `{"nome":"","cnpj":"","endereco":""}`.
    Party,
    /// Array of line items, default `[]`.
    Items,
    /// Array of tax entries, default `[]`.
    Taxes,
}

impl FieldKind {
    /// Default value for this kind.
    pub fn default_value(self) -> Value {
        match self {
            FieldKind::Text => Value::String(String::new()),
            FieldKind::Integer => json!(0),
            FieldKind::Party => object_from(PARTY_FIELDS),
            FieldKind::Items | FieldKind::Taxes => Value::Array(Vec::new()),
        }
    }

    /// Human-readable type name used in contract errors.
    pub fn type_name(self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::Integer => "int",
            FieldKind::Party => "object",
            FieldKind::Items | FieldKind::Taxes => "array",
        }
    }
}

/// Top-level fields in declaration order.
pub const ROOT_FIELDS: &[(&str, FieldKind)] = &[
    ("numero_fatura", FieldKind::Text),
    ("data_emissao", FieldKind::Text),
    ("data_vencimento", FieldKind::Text),
    ("empresa_emissora", FieldKind::Party),
    ("cliente", FieldKind::Party),
    ("itens", FieldKind::Items),
    ("tributos", FieldKind::Taxes),
    ("subtotal_itens_centavos", FieldKind::Integer),
    ("valor_total_fatura_centavos", FieldKind::Integer),
];

/// Party fields.
pub const PARTY_FIELDS: &[(&str, FieldKind)] = &[
    ("nome", FieldKind::Text),
    ("cnpj", FieldKind::Text),
    ("endereco", FieldKind::Text),
];

/// Line item fields.
pub const ITEM_FIELDS: &[(&str, FieldKind)] = &[
    ("descricao", FieldKind::Text),
    ("quantidade", FieldKind::Integer),
    ("valor_unitario_centavos", FieldKind::Integer),
    ("valor_total_item_centavos", FieldKind::Integer),
];

/// Tax entry fields.
pub const TAX_FIELDS: &[(&str, FieldKind)] = &[
    ("tipo", FieldKind::Text),
    ("valor_centavos", FieldKind::Integer),
];

/// Build an object holding the default of every field in `fields`.
pub fn object_from(fields: &[(&str, FieldKind)]) -> Value {
    let map: Map<String, Value> = fields
        .iter()
        .map(|(name, kind)| ((*name).to_string(), kind.default_value()))
        .collect();
    Value::Object(map)
}

/// The fully defaulted canonical payload.
pub fn default_payload() -> Value {
    object_from(ROOT_FIELDS)
}
