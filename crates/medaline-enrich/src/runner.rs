//! Enrichment stage: tally medals, send a capped prefix of rows through the
//! service in fixed-size chunks, merge results positionally, default the
//! rest.

use std::ops::Range;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, ensure};
use medaline_core::{SharedProgress, Table, fmt_num};
use serde_json::Value;

use crate::api;
use crate::config::Config;
use crate::items::build_item;
use crate::medals::medal_counts;
use crate::parser::parse_results;

/// Hard cap on rows sent to the service per run. Bounds token usage and is
/// deliberately not configurable.
pub const ENRICH_ROW_CAP: usize = 100;

/// Pause between consecutive chunk requests.
const CHUNK_PAUSE: Duration = Duration::from_millis(200);

/// Fallbacks for rows the service never saw and fields it omitted.
pub const DEFAULT_ARCHETYPE: &str = "unclassified";
pub const DEFAULT_HEALTH_POINTS: i64 = 50;

/// Enrichment stage execution summary
#[derive(Debug, Default)]
pub struct EnrichSummary {
    pub rows: usize,
    pub enriched_rows: usize,
    pub chunks: usize,
    pub defaulted_items: usize,
    pub elapsed: std::time::Duration,
}

impl EnrichSummary {
    pub fn log(&self) {
        log::info!("=== Enrich Summary ===");
        log::info!(
            "Rows: {} enriched of {} ({} chunks)",
            fmt_num(self.enriched_rows),
            fmt_num(self.rows),
            self.chunks
        );
        if self.defaulted_items > 0 {
            log::info!("Items with defaulted fields: {}", self.defaulted_items);
        }
        log::info!("Time: {:.1}s", self.elapsed.as_secs_f64());
    }
}

/// Run the enrichment stage over a loaded table.
pub fn run(table: &mut Table, config: &Config, progress: &SharedProgress) -> Result<EnrichSummary> {
    config.validate()?;
    let start = Instant::now();

    let counts = medal_counts(table)?;
    table.set_column("medal_count", counts.iter().map(|c| c.to_string()).collect())?;

    let enriched_rows = table.n_rows().min(ENRICH_ROW_CAP);
    if enriched_rows < table.n_rows() {
        log::warn!(
            "Enriching only the first {} of {} rows to bound service usage",
            fmt_num(enriched_rows),
            fmt_num(table.n_rows())
        );
    }

    let archetype_col = table.add_column("athlete_archetype", "");
    let health_col = table.add_column("health_points", "");

    let chunks = chunk_ranges(enriched_rows, config.batch_size);
    let mut summary = EnrichSummary {
        rows: table.n_rows(),
        enriched_rows,
        chunks: chunks.len(),
        ..Default::default()
    };

    let bar = progress.count_bar("enrich", chunks.len() as u64);
    for (i, rows) in chunks.iter().enumerate() {
        if i > 0 {
            std::thread::sleep(CHUNK_PAUSE);
        }

        let items: Vec<_> = rows.clone().map(|row| build_item(table, row)).collect();
        let content = api::complete(config, &items)
            .with_context(|| format!("enrichment request {}/{} failed", i + 1, chunks.len()))?;
        let results = parse_results(&content).with_context(|| {
            format!(
                "enrichment request {}/{} returned an unusable response",
                i + 1,
                chunks.len()
            )
        })?;

        merge_chunk(table, rows.clone(), &results, archetype_col, health_col, &mut summary)?;
        bar.inc(1);
    }
    bar.finish_and_clear();

    default_rows(table, enriched_rows..summary.rows, archetype_col, health_col);

    summary.elapsed = start.elapsed();
    Ok(summary)
}

/// Consecutive row ranges of at most `batch_size` rows covering `0..total`.
/// `batch_size` must be non-zero (the config validates it).
fn chunk_ranges(total: usize, batch_size: usize) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    while start < total {
        let end = (start + batch_size).min(total);
        ranges.push(start..end);
        start = end;
    }
    ranges
}

/// Merge one parsed result list into its chunk rows positionally: result
/// *i* enriches chunk row *i*.
///
/// The service is asked for exactly one result per item; any other count is
/// a correctness failure, never something to pad over. Fields missing from
/// an individual result fall back to the defaults.
fn merge_chunk(
    table: &mut Table,
    rows: Range<usize>,
    results: &[Value],
    archetype_col: usize,
    health_col: usize,
    summary: &mut EnrichSummary,
) -> Result<()> {
    ensure!(
        results.len() == rows.len(),
        "enrichment returned {} results for a chunk of {} rows",
        results.len(),
        rows.len()
    );

    for (row, result) in rows.zip(results) {
        let archetype = result.get("athlete_archetype").and_then(Value::as_str);
        let health = result.get("health_points").and_then(coerce_health);
        if archetype.is_none() || health.is_none() {
            summary.defaulted_items += 1;
        }

        table.set(row, archetype_col, archetype.unwrap_or(DEFAULT_ARCHETYPE).to_string());
        table.set(
            row,
            health_col,
            health.unwrap_or(DEFAULT_HEALTH_POINTS).to_string(),
        );
    }
    Ok(())
}

/// Fill the default archetype and health points into `rows`.
fn default_rows(table: &mut Table, rows: Range<usize>, archetype_col: usize, health_col: usize) {
    for row in rows {
        table.set(row, archetype_col, DEFAULT_ARCHETYPE.to_string());
        table.set(row, health_col, DEFAULT_HEALTH_POINTS.to_string());
    }
}

/// Integer coercion for health points: integers as-is, floats truncated,
/// numeric strings parsed. Anything else is unusable.
fn coerce_health(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
