//! Batch processing command for multiple extraction payloads.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use fatura_core::models::invoice::Invoice;
use fatura_core::normalize::{assert_payload_contract, PayloadSanitizer};

use super::output::{format_invoice, OutputFormat};
use super::{load_config, read_payload};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    invoice: Option<Invoice>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let sanitizer = Arc::new(PayloadSanitizer::from_config(&config.sanitizer));
    let enforce_contract = config.checks.enforce_contract;
    let jobs = args.jobs.max(1);
    let mut tasks = JoinSet::new();
    let mut results = Vec::new();

    // At most `jobs` files are in flight. A failure stops scheduling new
    // files; files already running still finish.
    for (index, path) in files.into_iter().enumerate() {
        if tasks.len() >= jobs {
            if let Some(joined) = tasks.join_next().await {
                collect(joined?, args.continue_on_error, &mut results, &mut tasks)?;
                overall_pb.inc(1);
            }
        }

        let sanitizer = Arc::clone(&sanitizer);
        tasks.spawn_blocking(move || {
            let file_start = Instant::now();
            let result = process_single_file(&path, &sanitizer, enforce_contract);
            (index, path, result, file_start.elapsed().as_millis() as u64)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        collect(joined?, args.continue_on_error, &mut results, &mut tasks)?;
        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    results.sort_by_key(|(index, _)| *index);
    let results: Vec<ProcessResult> = results.into_iter().map(|(_, r)| r).collect();

    let successful: Vec<_> = results.iter().filter(|r| r.invoice.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    for result in &successful {
        if config.checks.warn_on_subtotal_mismatch {
            if let Some(invoice) = &result.invoice {
                for issue in invoice.validate() {
                    warn!("{}: {}", result.path.display(), issue);
                }
            }
        }

        if let (Some(invoice), Some(output_dir)) = (&result.invoice, &args.output_dir) {
            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("invoice");

            let output_path = output_dir.join(format!("{}.{}", output_name, args.format.extension()));
            let content = format_invoice(invoice, args.format, config.output.pretty)?;

            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

type Finished = (usize, PathBuf, anyhow::Result<Invoice>, u64);

/// Record a finished file. Without `continue_on_error` a failure aborts the
/// remaining tasks and is returned.
fn collect(
    finished: Finished,
    continue_on_error: bool,
    results: &mut Vec<(usize, ProcessResult)>,
    tasks: &mut JoinSet<Finished>,
) -> anyhow::Result<()> {
    let (index, path, result, processing_time_ms) = finished;

    match result {
        Ok(invoice) => {
            results.push((
                index,
                ProcessResult {
                    path,
                    invoice: Some(invoice),
                    error: None,
                    processing_time_ms,
                },
            ));
        }
        Err(e) => {
            let error_msg = e.to_string();
            if !continue_on_error {
                error!("Failed to process {}: {}", path.display(), error_msg);
                tasks.abort_all();
                anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
            }

            warn!("Failed to process {}: {}", path.display(), error_msg);
            results.push((
                index,
                ProcessResult {
                    path,
                    invoice: None,
                    error: Some(error_msg),
                    processing_time_ms,
                },
            ));
        }
    }

    Ok(())
}

fn process_single_file(
    path: &Path,
    sanitizer: &PayloadSanitizer,
    enforce_contract: bool,
) -> anyhow::Result<Invoice> {
    let raw = read_payload(path)?;
    let invoice = sanitizer.sanitize(&raw);

    if enforce_contract {
        assert_payload_contract(&invoice.to_value())?;
    }

    debug!("Sanitized {}", path.display());
    Ok(invoice)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "numero_fatura",
        "data_emissao",
        "emissora_nome",
        "cliente_nome",
        "itens",
        "tributos",
        "valor_total_fatura_centavos",
        "issues",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(invoice) = &result.invoice {
            wtr.write_record([
                filename,
                "success",
                &invoice.numero_fatura,
                &invoice.data_emissao,
                &invoice.empresa_emissora.nome,
                &invoice.cliente.nome,
                &invoice.itens.len().to_string(),
                &invoice.tributos.len().to_string(),
                &invoice.valor_total_fatura_centavos.to_string(),
                &invoice.validate().join("; "),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
