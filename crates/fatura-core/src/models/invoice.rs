//! Canonical invoice record.
//!
//! Field names follow the extraction schema (Brazilian Portuguese), so the
//! serialized form of [`Invoice`] is the canonical payload itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A canonical invoice record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice number/identifier.
    pub numero_fatura: String,

    /// Issue date, kept as extracted.
    pub data_emissao: String,

    /// Due date, kept as extracted.
    pub data_vencimento: String,

    /// Issuer (seller).
    pub empresa_emissora: Party,

    /// Recipient (buyer).
    pub cliente: Party,

    /// Line items in source order.
    pub itens: Vec<LineItem>,

    /// Tax entries in source order.
    pub tributos: Vec<TaxEntry>,

    /// Subtotal of line items, in centavos.
    pub subtotal_itens_centavos: i64,

    /// Invoice grand total, in centavos.
    pub valor_total_fatura_centavos: i64,
}

/// An invoice counterpart (issuer or recipient).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Legal name.
    pub nome: String,

    /// Brazilian company tax ID (CNPJ), unformatted or as extracted.
    pub cnpj: String,

    /// Address as a single line.
    pub endereco: String,
}

/// A single line item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product/service description.
    pub descricao: String,

    /// Quantity.
    pub quantidade: i64,

    /// Unit price, in centavos.
    pub valor_unitario_centavos: i64,

    /// Line total, in centavos.
    pub valor_total_item_centavos: i64,
}

/// A tax entry (ISS, ICMS, PIS, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxEntry {
    /// Tax type label.
    pub tipo: String,

    /// Tax amount, in centavos.
    pub valor_centavos: i64,
}

impl Invoice {
    /// Sum of line totals, saturating at the `i64` bounds.
    pub fn computed_subtotal(&self) -> i64 {
        self.itens
            .iter()
            .fold(0i64, |acc, item| acc.saturating_add(item.valor_total_item_centavos))
    }

    /// Sum of tax amounts, saturating at the `i64` bounds.
    pub fn total_taxes(&self) -> i64 {
        self.tributos
            .iter()
            .fold(0i64, |acc, tax| acc.saturating_add(tax.valor_centavos))
    }

    /// Report consistency issues. Never modifies the record.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        let calculated = self.computed_subtotal();
        if calculated != self.subtotal_itens_centavos {
            issues.push(format!(
                "subtotal mismatch (calculated={}, extracted={})",
                calculated, self.subtotal_itens_centavos
            ));
        }

        issues
    }

    /// Canonical JSON form with fields in declaration order.
    pub fn to_value(&self) -> Value {
        // Serializing plain strings and integers cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
