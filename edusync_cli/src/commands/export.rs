//! The `export` subcommand: server-side attendance export, saved to disk.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use base64::Engine as _;
use clap::Args;
use edusync_lib::{Client, ExportFormat, FilterSet};

use super::parse_date;

#[derive(Args)]
pub struct ExportArgs {
    /// Export format: csv or xlsx
    #[arg(long, default_value = "csv")]
    pub format: String,

    /// Output file path (defaults to the filename the backend picks)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Restrict to one session
    #[arg(long)]
    pub session_id: Option<i64>,

    /// Restrict to one batch
    #[arg(long)]
    pub batch_id: Option<i64>,

    /// Records on/after this date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Records on/before this date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

pub async fn run(args: &ExportArgs, client: &Client) -> Result<()> {
    let format = match args.format.as_str() {
        "csv" => ExportFormat::Csv,
        "xlsx" => ExportFormat::Xlsx,
        other => bail!("--format must be csv or xlsx, got '{other}'"),
    };

    let mut filters = FilterSet::new();
    if let Some(session_id) = args.session_id {
        filters.set("session_id", session_id);
    }
    if let Some(batch_id) = args.batch_id {
        filters.set("batch_id", batch_id);
    }
    if let Some(ref from) = args.from {
        filters.set("date_from", parse_date("--from", from)?);
    }
    if let Some(ref to) = args.to {
        filters.set("date_to", parse_date("--to", to)?);
    }

    let receipt = client.export_attendances(format, &filters).await?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&receipt.content)
        .context("export payload is not valid base64")?;

    let out = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&receipt.filename));
    std::fs::write(&out, &bytes)
        .with_context(|| format!("cannot write export to {}", out.display()))?;

    eprintln!(
        "Wrote {} ({}, {} bytes)",
        out.display(),
        receipt.content_type,
        bytes.len()
    );
    Ok(())
}
