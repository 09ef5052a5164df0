//! Populate stage: fetch the country reference, resolve every row, append
//! the `country_population` column.

use std::time::Instant;

use anyhow::Result;
use indicatif::ProgressBar;
use medaline_core::{SharedProgress, Table, fmt_num};

use crate::api::fetch_countries;
use crate::index::PopulationIndex;
use crate::resolver::{Tier, resolve};

pub const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1/all";

/// Runtime configuration for the populate stage
#[derive(Debug, Clone)]
pub struct Config {
    /// REST Countries endpoint returning the country array
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Populate stage execution summary
#[derive(Debug, Default)]
pub struct PopulateSummary {
    pub rows: usize,
    pub countries: usize,
    pub resolved_ioc: usize,
    pub resolved_iso: usize,
    pub resolved_name: usize,
    pub unresolved: usize,
    pub elapsed: std::time::Duration,
}

impl PopulateSummary {
    pub fn resolved(&self) -> usize {
        self.resolved_ioc + self.resolved_iso + self.resolved_name
    }

    pub fn log(&self) {
        log::info!("=== Populate Summary ===");
        log::info!(
            "Rows: {}/{} resolved ({} unresolved)",
            fmt_num(self.resolved()),
            fmt_num(self.rows),
            fmt_num(self.unresolved)
        );
        log::info!(
            "Tiers: {} IOC, {} ISO, {} name",
            fmt_num(self.resolved_ioc),
            fmt_num(self.resolved_iso),
            fmt_num(self.resolved_name)
        );
        log::info!("Time: {:.1}s", self.elapsed.as_secs_f64());
    }
}

/// Run the populate stage over a loaded table.
pub fn run(
    table: &mut Table,
    config: &Config,
    progress: &SharedProgress,
) -> Result<PopulateSummary> {
    let start = Instant::now();

    let line = progress.stage_line("countries");
    line.set_message(format!("fetching {}", config.base_url));
    let records = fetch_countries(&config.base_url)?;
    let index = PopulationIndex::build(&records);
    line.finish_and_clear();

    let (ioc, iso, names) = index.sizes();
    log::info!(
        "Indexed {} country entries ({ioc} IOC, {iso} ISO, {names} names)",
        records.len()
    );

    let mut summary = PopulateSummary {
        rows: table.n_rows(),
        countries: records.len(),
        ..Default::default()
    };

    let bar = progress.count_bar("populate", table.n_rows() as u64);
    let populations = resolve_rows(table, &index, &mut summary, &bar);
    bar.finish_and_clear();

    table.set_column("country_population", populations)?;

    summary.elapsed = start.elapsed();
    Ok(summary)
}

/// Resolve each row to its population cell; unresolved rows stay empty,
/// never zero.
fn resolve_rows(
    table: &Table,
    index: &PopulationIndex,
    summary: &mut PopulateSummary,
    bar: &ProgressBar,
) -> Vec<String> {
    let mut cells = Vec::with_capacity(table.n_rows());
    for row in 0..table.n_rows() {
        let noc = table.value(row, "NOC");
        let team = table.value(row, "Team");
        match resolve(index, noc, team) {
            Some((tier, population)) => {
                match tier {
                    Tier::IocCode => summary.resolved_ioc += 1,
                    Tier::IsoCode => summary.resolved_iso += 1,
                    Tier::TeamName => summary.resolved_name += 1,
                }
                cells.push(population.to_string());
            }
            None => {
                summary.unresolved += 1;
                cells.push(String::new());
            }
        }
        bar.inc(1);
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::CountryRecord;

    fn athlete_table() -> Table {
        let mut t = Table::new(vec!["Name".into(), "Team".into(), "NOC".into()]);
        t.push_row(vec!["A".into(), "China".into(), "CHN".into()]).unwrap();
        t.push_row(vec!["B".into(), "Great Britain-2".into(), "XXG".into()])
            .unwrap();
        t.push_row(vec!["C".into(), "Soviet Union".into(), "URS".into()])
            .unwrap();
        t
    }

    #[test]
    fn resolve_rows_fills_cells_and_counters() {
        let payload = r#"[
            {"name": {"common": "China"}, "cca3": "CHN", "cioc": "CHN", "population": 1402112000},
            {"name": {"common": "Great Britain"}, "cca3": "GBR", "population": 67215293}
        ]"#;
        let records: Vec<CountryRecord> = serde_json::from_str(payload).unwrap();
        let index = PopulationIndex::build(&records);

        let table = athlete_table();
        let mut summary = PopulateSummary::default();
        let bar = ProgressBar::hidden();
        let cells = resolve_rows(&table, &index, &mut summary, &bar);

        assert_eq!(cells, vec!["1402112000", "67215293", ""]);
        assert_eq!(summary.resolved_ioc, 1);
        assert_eq!(summary.resolved_name, 1);
        assert_eq!(summary.unresolved, 1);
        assert_eq!(summary.resolved(), 2);
    }

    #[test]
    fn default_config_points_at_restcountries() {
        let config = Config::default();
        assert!(config.base_url.starts_with("https://restcountries.com/"));
    }
}
