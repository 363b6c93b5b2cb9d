//! Validate command - strict record validation of a canonical payload.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use fatura_core::normalize::{assert_payload_contract, build_record};

use super::output::{format_invoice, OutputFormat};
use super::{load_config, read_payload};

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Input file (canonical invoice JSON)
    #[arg(required = true)]
    input: PathBuf,

    /// Also require the exact canonical key set and scalar types
    #[arg(long)]
    contract: bool,

    /// Output format for the validated record
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Do not print the validated record
    #[arg(short, long)]
    quiet: bool,
}

pub async fn run(args: ValidateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    info!("Validating file: {}", args.input.display());
    let payload = read_payload(&args.input)?;

    if args.contract || config.checks.enforce_contract {
        assert_payload_contract(&payload)
            .map_err(|e| anyhow::anyhow!("Contract violation in {}: {}", args.input.display(), e))?;
    }

    let map = payload
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("Extraction output is not a JSON object"))?;
    let invoice = build_record(map)
        .map_err(|e| anyhow::anyhow!("Invalid invoice {}: {}", args.input.display(), e))?;

    if config.checks.warn_on_subtotal_mismatch {
        for issue in invoice.validate() {
            eprintln!("{} {}", style("⚠").yellow(), issue);
        }
    }

    if !args.quiet {
        println!("{}", format_invoice(&invoice, args.format, config.output.pretty)?);
    }

    eprintln!("{} {} is a valid invoice record", style("✓").green(), args.input.display());

    Ok(())
}
