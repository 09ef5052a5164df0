//! Medal tallies keyed by athlete identity.
//!
//! The tally always runs over the full table, even when only a prefix of
//! rows goes to the enrichment service.

use anyhow::{Result, ensure};
use medaline_core::Table;
use rustc_hash::FxHashMap;

/// Identity key columns, most stable first: the numeric ID when the table
/// has one, then whichever of name and country code exist, then name alone.
pub fn key_columns(table: &Table) -> Vec<&'static str> {
    if table.has_column("ID") {
        return vec!["ID"];
    }
    let fallback: Vec<&'static str> = ["Name", "NOC"]
        .into_iter()
        .filter(|c| table.has_column(c))
        .collect();
    if fallback.is_empty() {
        vec!["Name"]
    } else {
        fallback
    }
}

/// Per-row medal counts: for each row, the total number of medal-winning
/// rows of the same athlete anywhere in the table.
pub fn medal_counts(table: &Table) -> Result<Vec<i64>> {
    ensure!(
        table.has_column("Medal"),
        "expected a 'Medal' column to tally medals"
    );

    let columns = key_columns(table);
    let mut tally: FxHashMap<String, i64> = FxHashMap::default();
    let mut keys = Vec::with_capacity(table.n_rows());
    for row in 0..table.n_rows() {
        let key = row_key(table, row, &columns);
        if table.value(row, "Medal").is_some() {
            *tally.entry(key.clone()).or_insert(0) += 1;
        }
        keys.push(key);
    }

    Ok(keys
        .into_iter()
        .map(|key| tally.get(&key).copied().unwrap_or(0))
        .collect())
}

/// Join the key cells with an unprintable separator so composite keys
/// cannot collide with real cell values.
fn row_key(table: &Table, row: usize, columns: &[&str]) -> String {
    let mut key = String::new();
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            key.push('\x1f');
        }
        key.push_str(table.value(row, column).unwrap_or(""));
    }
    key
}
