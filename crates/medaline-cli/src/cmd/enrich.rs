//! `medaline enrich` - attach generated archetype/health-point columns

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use medaline_core::{SharedProgress, Table, fmt_num};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct EnrichArgs {
    /// Input CSV (default: the configured raw output)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output path for the enriched table
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Rows per service request
    #[arg(short, long)]
    pub batch_size: Option<usize>,
}

pub fn run(args: EnrichArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let input = args.input.unwrap_or_else(|| config.output.raw_path.clone());
    let mut table = Table::from_csv(&input).with_context(|| {
        format!(
            "failed to load {} (run `medaline populate` first?)",
            input.display()
        )
    })?;
    log::info!(
        "Loaded {} rows from {}",
        fmt_num(table.n_rows()),
        input.display()
    );

    let enrich_config = config.enrich_config(args.batch_size);
    let summary = medaline_enrich::run(&mut table, &enrich_config, progress)?;
    summary.log();

    let output = args
        .output
        .unwrap_or_else(|| config.output.enriched_path.clone());
    table
        .to_csv(&output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    log::info!("Wrote {} rows to {}", fmt_num(table.n_rows()), output.display());

    super::print_summary(
        "Enrich",
        &[
            (
                "Rows",
                format!(
                    "{} enriched of {}",
                    fmt_num(summary.enriched_rows),
                    fmt_num(summary.rows)
                ),
            ),
            ("Chunks", summary.chunks.to_string()),
            ("Defaulted items", summary.defaulted_items.to_string()),
            ("Output", output.display().to_string()),
            ("Time", format!("{:.1}s", summary.elapsed.as_secs_f64())),
        ],
    );

    Ok(())
}
