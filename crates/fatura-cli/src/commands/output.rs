//! Output formatting shared by the sanitize, validate and batch commands.

use fatura_core::models::invoice::{Invoice, Party};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Canonical JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension used for batch output files.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_invoice(invoice: &Invoice, format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(invoice)?),
        OutputFormat::Json => Ok(serde_json::to_string(invoice)?),
        OutputFormat::Csv => format_csv(invoice),
        OutputFormat::Text => Ok(format_text(invoice)),
    }
}

fn format_csv(invoice: &Invoice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "numero_fatura",
        "data_emissao",
        "data_vencimento",
        "emissora_nome",
        "emissora_cnpj",
        "cliente_nome",
        "cliente_cnpj",
        "itens",
        "tributos",
        "subtotal_itens_centavos",
        "valor_total_fatura_centavos",
    ])?;

    wtr.write_record([
        &invoice.numero_fatura,
        &invoice.data_emissao,
        &invoice.data_vencimento,
        &invoice.empresa_emissora.nome,
        &invoice.empresa_emissora.cnpj,
        &invoice.cliente.nome,
        &invoice.cliente.cnpj,
        &invoice.itens.len().to_string(),
        &invoice.tributos.len().to_string(),
        &invoice.subtotal_itens_centavos.to_string(),
        &invoice.valor_total_fatura_centavos.to_string(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(invoice: &Invoice) -> String {
    let mut output = String::new();

    output.push_str(&format!("Fatura: {}\n", invoice.numero_fatura));
    output.push_str(&format!("Emissão: {}\n", invoice.data_emissao));
    output.push_str(&format!("Vencimento: {}\n", invoice.data_vencimento));
    output.push('\n');

    push_party(&mut output, "Emissora", &invoice.empresa_emissora);
    push_party(&mut output, "Cliente", &invoice.cliente);

    output.push_str("Itens:\n");
    for item in &invoice.itens {
        output.push_str(&format!(
            "  {} x {} @ {} = {}\n",
            item.quantidade,
            item.descricao,
            format_brl(item.valor_unitario_centavos),
            format_brl(item.valor_total_item_centavos)
        ));
    }
    output.push('\n');

    if !invoice.tributos.is_empty() {
        output.push_str("Tributos:\n");
        for tax in &invoice.tributos {
            output.push_str(&format!("  {}: {}\n", tax.tipo, format_brl(tax.valor_centavos)));
        }
        output.push('\n');
    }

    output.push_str(&format!("Subtotal: {}\n", format_brl(invoice.subtotal_itens_centavos)));
    output.push_str(&format!("Total:    {}\n", format_brl(invoice.valor_total_fatura_centavos)));

    output
}

fn push_party(output: &mut String, label: &str, party: &Party) {
    output.push_str(&format!("{}:\n", label));
    output.push_str(&format!("  {}\n", party.nome));
    if !party.cnpj.is_empty() {
        output.push_str(&format!("  CNPJ: {}\n", party.cnpj));
    }
    if !party.endereco.is_empty() {
        output.push_str(&format!("  {}\n", party.endereco));
    }
    output.push('\n');
}

/// Format centavos in Brazilian style (R$ 1.234,56).
pub fn format_brl(centavos: i64) -> String {
    let magnitude = centavos.unsigned_abs();
    let integer = (magnitude / 100).to_string();
    let cents = magnitude % 100;

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    let sign = if centavos < 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(0), "R$ 0,00");
        assert_eq!(format_brl(5), "R$ 0,05");
        assert_eq!(format_brl(586675), "R$ 5.866,75");
        assert_eq!(format_brl(123456789), "R$ 1.234.567,89");
        assert_eq!(format_brl(-17500), "-R$ 175,00");
    }

    #[test]
    fn test_format_brl_extremes() {
        assert_eq!(format_brl(i64::MIN), "-R$ 92.233.720.368.547.758,08");
    }

    #[test]
    fn test_format_csv_row() {
        let invoice = Invoice {
            numero_fatura: "FAT-1".to_string(),
            subtotal_itens_centavos: 100,
            ..Invoice::default()
        };
        let csv = format_invoice(&invoice, OutputFormat::Csv, false).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("numero_fatura,"));
        assert_eq!(lines.next().unwrap(), "FAT-1,,,,,,,0,0,100,0");
    }

    #[test]
    fn test_format_text_totals() {
        let invoice = Invoice {
            valor_total_fatura_centavos: 586675,
            ..Invoice::default()
        };
        let text = format_invoice(&invoice, OutputFormat::Text, false).unwrap();
        assert!(text.contains("Total:    R$ 5.866,75"));
    }
}
