//! `medaline populate` - clean the athlete table and join country populations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use clap::Args;

use medaline_core::{SharedProgress, Table, fmt_num};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct PopulateArgs {
    /// Input athlete-event CSV (default: first existing configured path)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output path for the populated table
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: PopulateArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let mut table = load_input(args.input.as_deref(), config)?;
    clean_table(&mut table)?;

    let summary = medaline_countries::run(&mut table, &config.countries_config(), progress)?;
    summary.log();

    let output = args.output.unwrap_or_else(|| config.output.raw_path.clone());
    table
        .to_csv(&output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    log::info!("Wrote {} rows to {}", fmt_num(table.n_rows()), output.display());

    super::print_summary(
        "Populate",
        &[
            ("Rows", fmt_num(summary.rows)),
            ("Countries indexed", fmt_num(summary.countries)),
            (
                "Resolved",
                format!(
                    "{} ({} IOC, {} ISO, {} name)",
                    fmt_num(summary.resolved()),
                    fmt_num(summary.resolved_ioc),
                    fmt_num(summary.resolved_iso),
                    fmt_num(summary.resolved_name)
                ),
            ),
            ("Unresolved", fmt_num(summary.unresolved)),
            ("Output", output.display().to_string()),
            ("Time", format!("{:.1}s", summary.elapsed.as_secs_f64())),
        ],
    );

    Ok(())
}

/// Load the athlete table from an explicit path or the first existing
/// configured candidate.
pub(crate) fn load_input(override_path: Option<&Path>, config: &Config) -> Result<Table> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => config
            .input
            .paths
            .iter()
            .find(|p| p.exists())
            .cloned()
            .with_context(|| {
                format!(
                    "no input CSV found; tried {}",
                    config
                        .input
                        .paths
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })?,
    };

    let table = Table::from_csv(&path)?;
    log::info!(
        "Loaded {} rows from {}",
        fmt_num(table.n_rows()),
        path.display()
    );
    Ok(table)
}

/// Drop columns the pipeline never reads and flag medal winners.
///
/// `Medal` is required; every other column is read defensively.
pub(crate) fn clean_table(table: &mut Table) -> Result<()> {
    for column in ["City", "Games"] {
        if table.drop_column(column) {
            log::debug!("Dropped '{column}' column");
        }
    }

    ensure!(
        table.has_column("Medal"),
        "input is missing the required 'Medal' column"
    );

    let flags = (0..table.n_rows())
        .map(|row| {
            let won = table.value(row, "Medal").is_some();
            if won { "true" } else { "false" }.to_string()
        })
        .collect();
    table.set_column("did_medal", flags)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_table() -> Table {
        let mut t = Table::new(
            ["Name", "City", "Games", "Medal"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        t.push_row(vec![
            "A Dijiang".to_string(),
            "Barcelona".to_string(),
            "1992 Summer".to_string(),
            "Gold".to_string(),
        ])
        .unwrap();
        t.push_row(vec![
            "Edgar Aabye".to_string(),
            "Paris".to_string(),
            "1900 Summer".to_string(),
            "NA".to_string(),
        ])
        .unwrap();
        t
    }

    #[test]
    fn clean_drops_city_and_games() {
        let mut t = sample_table();
        clean_table(&mut t).unwrap();
        assert!(!t.has_column("City"));
        assert!(!t.has_column("Games"));
        assert!(t.has_column("Medal"));
    }

    #[test]
    fn clean_tolerates_absent_drop_columns() {
        let mut t = Table::new(vec!["Name".to_string(), "Medal".to_string()]);
        t.push_row(vec!["X".to_string(), "Silver".to_string()]).unwrap();
        clean_table(&mut t).unwrap();
        assert_eq!(t.headers(), &["Name", "Medal", "did_medal"]);
    }

    #[test]
    fn clean_requires_medal_column() {
        let mut t = Table::new(vec!["Name".to_string()]);
        let err = clean_table(&mut t).unwrap_err();
        assert!(err.to_string().contains("'Medal'"));
    }

    #[test]
    fn did_medal_flags_present_medals() {
        let mut t = sample_table();
        clean_table(&mut t).unwrap();
        assert_eq!(t.value(0, "did_medal"), Some("true"));
        assert_eq!(t.value(1, "did_medal"), Some("false"));
    }

    #[test]
    fn load_input_honors_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Name,Medal\nX,Gold").unwrap();

        let table = load_input(Some(file.path()), &Config::default()).unwrap();
        assert_eq!(table.n_rows(), 1);
        assert_eq!(table.value(0, "Name"), Some("X"));
    }

    #[test]
    fn load_input_errors_name_the_candidates() {
        let mut config = Config::default();
        config.input.paths = vec![PathBuf::from("/nonexistent/events.csv")];

        let err = load_input(None, &config).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/events.csv"));
    }
}
