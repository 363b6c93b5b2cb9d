//! Lenient payload sanitizer.
//!
//! Reshapes any decoded payload into the canonical invoice shape. Missing or
//! mistyped fields take their schema default, non-object collection elements
//! are dropped, and extra keys are discarded. The sanitizer never fails.

use serde_json::{Map, Value};
use tracing::debug;

use crate::models::config::SanitizerConfig;
use crate::models::invoice::{Invoice, LineItem, Party, TaxEntry};

use super::coerce::{as_string, to_int};
use super::keys::normalize_keys;
use super::mojibake::repair_mojibake;

/// Sanitizer turning raw extraction output into a canonical [`Invoice`].
#[derive(Debug, Clone)]
pub struct PayloadSanitizer {
    /// Whether to repair UTF-8-as-Latin-1 strings.
    repair_mojibake: bool,
}

impl PayloadSanitizer {
    /// Create a sanitizer with default settings.
    pub fn new() -> Self {
        Self {
            repair_mojibake: true,
        }
    }

    /// Create a sanitizer from configuration.
    pub fn from_config(config: &SanitizerConfig) -> Self {
        Self::new().with_mojibake_repair(config.repair_mojibake)
    }

    /// Set mojibake repair.
    pub fn with_mojibake_repair(mut self, repair: bool) -> Self {
        self.repair_mojibake = repair;
        self
    }

    /// Sanitize a payload into a typed record.
    ///
    /// A payload that is not an object sanitizes like `{}`.
    pub fn sanitize(&self, payload: &Value) -> Invoice {
        let normalized = normalize_keys(payload);
        let empty = Map::new();
        let root = normalized.as_object().unwrap_or(&empty);

        Invoice {
            numero_fatura: self.text(root.get("numero_fatura")),
            data_emissao: self.text(root.get("data_emissao")),
            data_vencimento: self.text(root.get("data_vencimento")),
            empresa_emissora: self.party(root.get("empresa_emissora")),
            cliente: self.party(root.get("cliente")),
            itens: self.collection(root.get("itens"), "itens", |item| self.line_item(item)),
            tributos: self.collection(root.get("tributos"), "tributos", |tax| self.tax_entry(tax)),
            subtotal_itens_centavos: int(root.get("subtotal_itens_centavos")),
            valor_total_fatura_centavos: int(root.get("valor_total_fatura_centavos")),
        }
    }

    /// Sanitize a payload into canonical JSON.
    pub fn normalize(&self, payload: &Value) -> Value {
        self.sanitize(payload).to_value()
    }

    fn text(&self, value: Option<&Value>) -> String {
        let mut text = value.map(as_string).unwrap_or_default();
        if !self.repair_mojibake {
            return text;
        }

        // A repair can expose edge whitespace, and trimming can expose another
        // repairable layer. Stop once neither changes the text.
        loop {
            let repaired = repair_mojibake(&text);
            let trimmed = repaired.trim();
            if trimmed == text {
                return text;
            }
            text = trimmed.to_string();
        }
    }

    fn party(&self, value: Option<&Value>) -> Party {
        let empty = Map::new();
        let source = value.and_then(Value::as_object).unwrap_or(&empty);

        Party {
            nome: self.text(source.get("nome")),
            cnpj: self.text(source.get("cnpj")),
            endereco: self.text(source.get("endereco")),
        }
    }

    fn line_item(&self, item: &Map<String, Value>) -> LineItem {
        LineItem {
            descricao: self.text(item.get("descricao")),
            quantidade: int(item.get("quantidade")),
            valor_unitario_centavos: int(item.get("valor_unitario_centavos")),
            valor_total_item_centavos: int(item.get("valor_total_item_centavos")),
        }
    }

    fn tax_entry(&self, tax: &Map<String, Value>) -> TaxEntry {
        TaxEntry {
            tipo: self.text(tax.get("tipo")),
            valor_centavos: int(tax.get("valor_centavos")),
        }
    }

    fn collection<T>(
        &self,
        value: Option<&Value>,
        field: &str,
        build: impl Fn(&Map<String, Value>) -> T,
    ) -> Vec<T> {
        let Some(elements) = value.and_then(Value::as_array) else {
            if value.is_some_and(|v| !v.is_null()) {
                debug!("{} is not an array, using empty list", field);
            }
            return Vec::new();
        };

        let out: Vec<T> = elements.iter().filter_map(Value::as_object).map(build).collect();

        let dropped = elements.len() - out.len();
        if dropped > 0 {
            debug!("Dropped {} non-object element(s) from {}", dropped, field);
        }

        out
    }
}

impl Default for PayloadSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

fn int(value: Option<&Value>) -> i64 {
    value.map(to_int).unwrap_or(0)
}

/// Sanitize a payload into canonical JSON with default settings.
pub fn normalize_payload(payload: &Value) -> Value {
    PayloadSanitizer::new().normalize(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::default_payload;
    use crate::normalize::contract::assert_payload_contract;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_empty_payload_defaults() {
        let expected = json!({
            "numero_fatura": "",
            "data_emissao": "",
            "data_vencimento": "",
            "empresa_emissora": {"nome": "", "cnpj": "", "endereco": ""},
            "cliente": {"nome": "", "cnpj": "", "endereco": ""},
            "itens": [],
            "tributos": [],
            "subtotal_itens_centavos": 0,
            "valor_total_fatura_centavos": 0
        });

        assert_eq!(normalize_payload(&json!({})), expected);
        assert_eq!(normalize_payload(&json!({})), default_payload());
    }

    #[test]
    fn test_non_object_payload_defaults() {
        assert_eq!(normalize_payload(&json!([1, 2, 3])), default_payload());
        assert_eq!(normalize_payload(&Value::Null), default_payload());
    }

    #[test]
    fn test_non_object_items_dropped() {
        let payload = json!({
            "itens": ["oops", {"descricao": "A", "quantidade": 2}, 99]
        });

        let output = normalize_payload(&payload);
        assert_eq!(
            output["itens"],
            json!([{
                "descricao": "A",
                "quantidade": 2,
                "valor_unitario_centavos": 0,
                "valor_total_item_centavos": 0
            }])
        );
    }

    #[test]
    fn test_item_order_preserved() {
        let payload = json!({
            "itens": [{"descricao": "A"}, null, {"descricao": "B"}, [], {"descricao": "C"}]
        });

        let invoice = PayloadSanitizer::new().sanitize(&payload);
        let names: Vec<&str> = invoice.itens.iter().map(|i| i.descricao.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_mistyped_containers_default() {
        let payload = json!({
            "empresa_emissora": "Tech Ltda",
            "cliente": [1, 2],
            "itens": {"descricao": "A"},
            "tributos": "ISS"
        });

        let invoice = PayloadSanitizer::new().sanitize(&payload);
        assert_eq!(invoice.empresa_emissora, Party::default());
        assert_eq!(invoice.cliente, Party::default());
        assert!(invoice.itens.is_empty());
        assert!(invoice.tributos.is_empty());
    }

    #[test]
    fn test_extraction_fixture() {
        let raw = json!({
            "numero_fatura": "FAT-2026-00125",
            "data_emissao": "2026-02-10",
            "data_vencimento": "2026-02-25",
            "empresa_emissora": {
                "nome": "Tech Solutions Brasil Ltda",
                "cnpj": "12.345.678/0001-90",
                "endereco": "Rua X",
                "itens": [],
                "tributos": []
            },
            "cliente": {
                "nome": "Cliente",
                "cnpj": "98.765.432/0001-55",
                "endereco": "Rua Y",
                "itens": [],
                "tributos": []
            },
            "itens": [{
                "descrição": "Servico A",
                "quantidade": "1.0",
                "valor_unitário_centavos": 350000.0,
                "valor_total_item_centavos": "350000",
                "itens": [],
                "tributos": []
            }],
            "tributos": [{
                "tipo": "ISS",
                "valor_centavos": "17500.0",
                "itens": [],
                "tributos": []
            }],
            "subtotal_itens_centavos": 560000.0,
            "valor_total_fatura_centavos": "586675.0",
            "extra_campo_indevido": "remove-me"
        });

        let payload = normalize_payload(&raw);
        assert_payload_contract(&payload).unwrap();

        let invoice = PayloadSanitizer::new().sanitize(&raw);
        assert_eq!(invoice.numero_fatura, "FAT-2026-00125");
        assert_eq!(invoice.empresa_emissora.cnpj, "12.345.678/0001-90");
        assert_eq!(
            invoice.itens,
            vec![LineItem {
                descricao: "Servico A".to_string(),
                quantidade: 1,
                valor_unitario_centavos: 350000,
                valor_total_item_centavos: 350000,
            }]
        );
        assert_eq!(
            invoice.tributos,
            vec![TaxEntry {
                tipo: "ISS".to_string(),
                valor_centavos: 17500,
            }]
        );
        assert_eq!(invoice.subtotal_itens_centavos, 560000);
        assert_eq!(invoice.valor_total_fatura_centavos, 586675);
        assert!(payload.get("extra_campo_indevido").is_none());
    }

    #[test]
    fn test_messy_keys_and_numbers() {
        let raw = json!({
            " Número Fatura ": 125,
            "Data Emissão": "10/02/2026",
            "Cliente": {"Nome": "  Maria  ", "CNPJ": null, "Endereço": true},
            "Subtotal Itens Centavos": "1.234,56",
            "Valor Total Fatura Centavos": "R$ 12,00"
        });

        let invoice = PayloadSanitizer::new().sanitize(&raw);
        assert_eq!(invoice.numero_fatura, "125");
        assert_eq!(invoice.data_emissao, "10/02/2026");
        assert_eq!(
            invoice.cliente,
            Party {
                nome: "Maria".to_string(),
                cnpj: String::new(),
                endereco: "true".to_string(),
            }
        );
        assert_eq!(invoice.subtotal_itens_centavos, 1235);
        assert_eq!(invoice.valor_total_fatura_centavos, 0);
    }

    #[test]
    fn test_mojibake_repair_toggle() {
        let raw = json!({"itens": [{"descricao": "ServiÃ§o"}]});

        let repaired = PayloadSanitizer::new().sanitize(&raw);
        assert_eq!(repaired.itens[0].descricao, "Serviço");

        let kept = PayloadSanitizer::new().with_mojibake_repair(false).sanitize(&raw);
        assert_eq!(kept.itens[0].descricao, "ServiÃ§o");
    }

    #[test]
    fn test_repaired_text_is_stable() {
        let raw = json!({
            "numero_fatura": "Â\u{a0}FAT-1",
            "itens": [{"descricao": "ServiÃ\u{83}Â§o"}]
        });

        let once = normalize_payload(&raw);
        assert_eq!(once["numero_fatura"], json!("FAT-1"));
        assert_eq!(once["itens"][0]["descricao"], json!("Serviço"));
        assert_eq!(normalize_payload(&once), once);
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            (-1.0e12f64..1.0e12).prop_map(Value::from),
            "[a-zA-Z0-9 .,çãéÃÂ\u{a0}\u{83}\u{a7}-]{0,12}".prop_map(Value::String),
        ];

        leaf.prop_recursive(4, 64, 6, |inner| {
            let key = prop_oneof![
                prop::sample::select(vec![
                    "numero_fatura",
                    "Número Fatura",
                    "cliente",
                    "Empresa Emissora",
                    "itens",
                    "tributos",
                    "nome",
                    "descrição",
                    "quantidade",
                    "valor_centavos",
                    "Subtotal Itens Centavos",
                ])
                .prop_map(str::to_string),
                "[a-zA-Z _]{0,8}",
            ];
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::vec((key, inner), 0..6)
                    .prop_map(|entries| Value::Object(entries.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Sanitizing canonical output is the identity.
        #[test]
        fn normalize_payload_is_idempotent(raw in arb_json()) {
            let once = normalize_payload(&raw);
            let twice = normalize_payload(&once);
            prop_assert_eq!(once, twice);
        }

        /// Every sanitized payload satisfies the exact canonical contract.
        #[test]
        fn sanitized_payload_meets_contract(raw in arb_json()) {
            let payload = normalize_payload(&raw);
            prop_assert!(assert_payload_contract(&payload).is_ok());
        }
    }
}
