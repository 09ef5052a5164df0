//! `medaline run` - full pipeline: clean, populate, enrich, write both outputs

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use medaline_core::{SharedProgress, fmt_num};

use crate::cmd::populate::{clean_table, load_input};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Input athlete-event CSV (default: first existing configured path)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output path for the populated table
    #[arg(long)]
    pub raw_output: Option<PathBuf>,

    /// Output path for the enriched table
    #[arg(long)]
    pub enriched_output: Option<PathBuf>,

    /// Rows per service request
    #[arg(short, long)]
    pub batch_size: Option<usize>,
}

pub fn run(args: RunArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    // Validate the enrichment config before any table or network work:
    // a missing credential should fail the run up front, not after the
    // populate stage has already spent its requests.
    let enrich_config = config.enrich_config(args.batch_size);
    enrich_config.validate()?;

    let mut table = load_input(args.input.as_deref(), config)?;
    clean_table(&mut table)?;

    let populate_summary =
        medaline_countries::run(&mut table, &config.countries_config(), progress)?;
    populate_summary.log();

    let raw_output = args
        .raw_output
        .unwrap_or_else(|| config.output.raw_path.clone());
    table
        .to_csv(&raw_output)
        .with_context(|| format!("failed to write {}", raw_output.display()))?;
    log::info!(
        "Wrote {} rows to {}",
        fmt_num(table.n_rows()),
        raw_output.display()
    );

    let enrich_summary = medaline_enrich::run(&mut table, &enrich_config, progress)?;
    enrich_summary.log();

    let enriched_output = args
        .enriched_output
        .unwrap_or_else(|| config.output.enriched_path.clone());
    table
        .to_csv(&enriched_output)
        .with_context(|| format!("failed to write {}", enriched_output.display()))?;
    log::info!(
        "Wrote {} rows to {}",
        fmt_num(table.n_rows()),
        enriched_output.display()
    );

    super::print_summary(
        "Pipeline",
        &[
            ("Rows", fmt_num(populate_summary.rows)),
            (
                "Populations resolved",
                format!(
                    "{} ({} unresolved)",
                    fmt_num(populate_summary.resolved()),
                    fmt_num(populate_summary.unresolved)
                ),
            ),
            (
                "Rows enriched",
                format!(
                    "{} in {} chunks",
                    fmt_num(enrich_summary.enriched_rows),
                    enrich_summary.chunks
                ),
            ),
            ("Raw output", raw_output.display().to_string()),
            ("Enriched output", enriched_output.display().to_string()),
            (
                "Time",
                format!(
                    "{:.1}s",
                    (populate_summary.elapsed + enrich_summary.elapsed).as_secs_f64()
                ),
            ),
        ],
    );

    Ok(())
}
