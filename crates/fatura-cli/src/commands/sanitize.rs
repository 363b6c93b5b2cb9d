//! Sanitize command - normalize a single extraction payload.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info, warn};

use fatura_core::normalize::{assert_payload_contract, build_record, PayloadSanitizer};

use super::output::{format_invoice, OutputFormat};
use super::{load_config, read_payload};

/// Arguments for the sanitize command.
#[derive(Args)]
pub struct SanitizeArgs {
    /// Input file (raw extraction JSON)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Run the strict validator on the result and report consistency issues
    #[arg(long)]
    validate: bool,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,
}

pub async fn run(args: SanitizeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    info!("Sanitizing file: {}", args.input.display());
    let raw = read_payload(&args.input)?;

    let sanitizer = PayloadSanitizer::from_config(&config.sanitizer);
    let invoice = sanitizer.sanitize(&raw);

    if config.checks.enforce_contract {
        assert_payload_contract(&invoice.to_value())?;
    }

    if args.validate {
        let canonical = invoice.to_value();
        let map = canonical
            .as_object()
            .ok_or_else(|| anyhow::anyhow!("Sanitized output is not a JSON object"))?;
        build_record(map).map_err(|e| {
            anyhow::anyhow!("Sanitized output of {} failed strict validation: {}", args.input.display(), e)
        })?;
        eprintln!("{} Strict validation passed", style("✓").green());
    }

    if args.validate || config.checks.warn_on_subtotal_mismatch {
        let issues = invoice.validate();
        for issue in &issues {
            warn!("{}", issue);
        }
        if args.validate && !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let pretty = config.output.pretty && !args.compact;
    let output = format_invoice(&invoice, args.format, pretty)?;

    if let Some(output_path) = &args.output {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Saved: {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    eprintln!(
        "{} Summary: itens={}, tributos={}",
        style("ℹ").blue(),
        invoice.itens.len(),
        invoice.tributos.len()
    );

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
