//! Strict record validation.
//!
//! Unlike the sanitizer, the validator refuses payloads whose top-level
//! structure is unusable. It still drops non-object collection elements and
//! defaults missing sub-fields.

use serde_json::{Map, Value};

use crate::error::RecordError;
use crate::models::invoice::{Invoice, LineItem, Party, TaxEntry};
use crate::models::schema::{FieldKind, ROOT_FIELDS};

use super::coerce::{as_string, to_int};

/// Build a typed [`Invoice`] from a canonical-shaped object.
///
/// Fails with [`RecordError::MissingField`] for the first absent required key
/// (declaration order), then with [`RecordError::InvalidShape`] for a party
/// that is not an object or a collection that is not an array.
pub fn build_record(data: &Map<String, Value>) -> Result<Invoice, RecordError> {
    if let Some((name, _)) = ROOT_FIELDS.iter().find(|(name, _)| !data.contains_key(*name)) {
        return Err(RecordError::MissingField((*name).to_string()));
    }

    for (name, kind) in ROOT_FIELDS {
        let value = &data[*name];
        let valid = match kind {
            FieldKind::Party => value.is_object(),
            FieldKind::Items | FieldKind::Taxes => value.is_array(),
            FieldKind::Text | FieldKind::Integer => true,
        };
        if !valid {
            return Err(RecordError::InvalidShape((*name).to_string()));
        }
    }

    Ok(Invoice {
        numero_fatura: as_string(&data["numero_fatura"]),
        data_emissao: as_string(&data["data_emissao"]),
        data_vencimento: as_string(&data["data_vencimento"]),
        empresa_emissora: party(&data["empresa_emissora"]),
        cliente: party(&data["cliente"]),
        itens: objects(&data["itens"]).map(line_item).collect(),
        tributos: objects(&data["tributos"]).map(tax_entry).collect(),
        subtotal_itens_centavos: to_int(&data["subtotal_itens_centavos"]),
        valor_total_fatura_centavos: to_int(&data["valor_total_fatura_centavos"]),
    })
}

fn objects(value: &Value) -> impl Iterator<Item = &Map<String, Value>> {
    value
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn text(map: &Map<String, Value>, key: &str) -> String {
    map.get(key).map(as_string).unwrap_or_default()
}

fn int(map: &Map<String, Value>, key: &str) -> i64 {
    map.get(key).map(to_int).unwrap_or(0)
}

fn party(value: &Value) -> Party {
    let empty = Map::new();
    let source = value.as_object().unwrap_or(&empty);

    Party {
        nome: text(source, "nome"),
        cnpj: text(source, "cnpj"),
        endereco: text(source, "endereco"),
    }
}

fn line_item(item: &Map<String, Value>) -> LineItem {
    LineItem {
        descricao: text(item, "descricao"),
        quantidade: int(item, "quantidade"),
        valor_unitario_centavos: int(item, "valor_unitario_centavos"),
        valor_total_item_centavos: int(item, "valor_total_item_centavos"),
    }
}

fn tax_entry(tax: &Map<String, Value>) -> TaxEntry {
    TaxEntry {
        tipo: text(tax, "tipo"),
        valor_centavos: int(tax, "valor_centavos"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::sanitizer::PayloadSanitizer;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn canonical() -> Value {
        json!({
            "numero_fatura": "1",
            "data_emissao": "2026-02-10",
            "data_vencimento": "2026-02-25",
            "empresa_emissora": {"nome": "Tech", "cnpj": "12.345.678/0001-90", "endereco": "Rua X"},
            "cliente": {"nome": "Cliente", "cnpj": "98.765.432/0001-55", "endereco": "Rua Y"},
            "itens": [{
                "descricao": "Servico A",
                "quantidade": 1,
                "valor_unitario_centavos": 350000,
                "valor_total_item_centavos": 350000
            }],
            "tributos": [{"tipo": "ISS", "valor_centavos": 17500}],
            "subtotal_itens_centavos": 350000,
            "valor_total_fatura_centavos": 367500
        })
    }

    fn record(value: &Value) -> Result<Invoice, RecordError> {
        build_record(value.as_object().unwrap())
    }

    #[test]
    fn test_build_record_valid() {
        let invoice = record(&canonical()).unwrap();
        assert_eq!(invoice.numero_fatura, "1");
        assert_eq!(invoice.cliente.nome, "Cliente");
        assert_eq!(invoice.itens.len(), 1);
        assert_eq!(invoice.tributos[0].valor_centavos, 17500);
        assert_eq!(invoice.valor_total_fatura_centavos, 367500);
    }

    #[test]
    fn test_missing_field() {
        let mut value = canonical();
        value.as_object_mut().unwrap().remove("cliente");
        assert_eq!(record(&value), Err(RecordError::MissingField("cliente".to_string())));
    }

    #[test]
    fn test_missing_field_reports_first_in_declaration_order() {
        let mut value = canonical();
        let map = value.as_object_mut().unwrap();
        map.remove("valor_total_fatura_centavos");
        map.remove("data_emissao");
        assert_eq!(
            record(&value),
            Err(RecordError::MissingField("data_emissao".to_string()))
        );
    }

    #[test]
    fn test_missing_takes_precedence_over_shape() {
        let mut value = canonical();
        let map = value.as_object_mut().unwrap();
        map.insert("cliente".to_string(), json!("not an object"));
        map.remove("tributos");
        assert_eq!(record(&value), Err(RecordError::MissingField("tributos".to_string())));
    }

    #[test]
    fn test_invalid_party_shape() {
        let mut value = canonical();
        value["cliente"] = json!("not an object");
        assert_eq!(record(&value), Err(RecordError::InvalidShape("cliente".to_string())));

        value["cliente"] = Value::Null;
        assert_eq!(record(&value), Err(RecordError::InvalidShape("cliente".to_string())));
    }

    #[test]
    fn test_invalid_collection_shape() {
        let mut value = canonical();
        value["itens"] = json!({"descricao": "A"});
        assert_eq!(record(&value), Err(RecordError::InvalidShape("itens".to_string())));

        let mut value = canonical();
        value["tributos"] = json!("ISS");
        assert_eq!(record(&value), Err(RecordError::InvalidShape("tributos".to_string())));
    }

    #[test]
    fn test_non_object_elements_dropped() {
        let mut value = canonical();
        value["tributos"] = json!([{"tipo": "ISS", "valor_centavos": 100}, "PIS", {"tipo": "ICMS"}]);

        let invoice = record(&value).unwrap();
        assert_eq!(
            invoice.tributos,
            vec![
                TaxEntry { tipo: "ISS".to_string(), valor_centavos: 100 },
                TaxEntry { tipo: "ICMS".to_string(), valor_centavos: 0 },
            ]
        );
    }

    #[test]
    fn test_party_sub_fields_default() {
        let mut value = canonical();
        value["empresa_emissora"] = json!({"nome": "Tech"});

        let invoice = record(&value).unwrap();
        assert_eq!(
            invoice.empresa_emissora,
            Party {
                nome: "Tech".to_string(),
                ..Party::default()
            }
        );
    }

    #[test]
    fn test_sanitized_output_always_builds() {
        let raw = json!({"cliente": 5, "itens": "x", "Número Fatura": " 9 "});
        let sanitized = PayloadSanitizer::new().sanitize(&raw);
        let rebuilt = record(&sanitized.to_value()).unwrap();
        assert_eq!(rebuilt, sanitized);
    }

    #[test]
    fn test_error_field_accessor() {
        assert_eq!(RecordError::InvalidShape("itens".to_string()).field(), "itens");
    }
}
