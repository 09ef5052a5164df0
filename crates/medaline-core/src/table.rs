//! In-memory model of the athlete-event table.
//!
//! Cells are untyped text exactly as they appear in the CSV. A cell is
//! *missing* when it is empty or the dataset's `NA` marker. Column order is
//! preserved on write; appended columns go last. Reads are defensive:
//! looking up a column that does not exist is not an error.

use std::path::Path;

use anyhow::{Context, Result, ensure};

/// The dataset writes missing values as `NA`.
pub fn is_missing(cell: &str) -> bool {
    cell.is_empty() || cell == "NA"
}

/// Ordered-column table of string cells.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Read a table from CSV. The first record is the header row.
    ///
    /// Ragged rows are padded (or truncated) to the header width.
    pub fn from_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        let headers: Vec<String> = reader
            .headers()
            .with_context(|| format!("failed to read header row of {}", path.display()))?
            .iter()
            .map(String::from)
            .collect();

        let width = headers.len();
        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record
                .with_context(|| format!("bad CSV record {} in {}", i + 1, path.display()))?;
            let mut row: Vec<String> = record.iter().map(String::from).collect();
            row.resize(width, String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Write the table as CSV, creating parent directories as needed.
    pub fn to_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }

        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        writer
            .write_record(&self.headers)
            .context("failed to write header row")?;
        for row in &self.rows {
            writer.write_record(row).context("failed to write row")?;
        }
        writer.flush().context("failed to flush CSV writer")?;
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell value at (row, named column).
    ///
    /// `None` when the column does not exist, the row is out of range, or
    /// the cell is missing.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        let cell = self.rows.get(row)?.get(idx)?;
        if is_missing(cell) {
            None
        } else {
            Some(cell.as_str())
        }
    }

    /// Append a row. Must match the header width.
    pub fn push_row(&mut self, row: Vec<String>) -> Result<()> {
        ensure!(
            row.len() == self.headers.len(),
            "row has {} cells, table has {} columns",
            row.len(),
            self.headers.len()
        );
        self.rows.push(row);
        Ok(())
    }

    /// Append a column with per-row values, or overwrite it if it already
    /// exists (re-running a stage replaces its own output columns).
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        ensure!(
            values.len() == self.rows.len(),
            "column {name} has {} values, table has {} rows",
            values.len(),
            self.rows.len()
        );
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Append a column filled with a constant (or reset an existing one).
    /// Returns the column index for subsequent `set` calls.
    pub fn add_column(&mut self, name: &str, fill: &str) -> usize {
        match self.column_index(name) {
            Some(idx) => {
                for row in &mut self.rows {
                    row[idx] = fill.to_string();
                }
                idx
            }
            None => {
                self.headers.push(name.to_string());
                for row in &mut self.rows {
                    row.push(fill.to_string());
                }
                self.headers.len() - 1
            }
        }
    }

    /// Set one cell by column index. Row and column must be in bounds.
    pub fn set(&mut self, row: usize, column: usize, value: String) {
        self.rows[row][column] = value;
    }

    /// Drop a column if present. Returns whether it existed.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        self.headers.remove(idx);
        for row in &mut self.rows {
            row.remove(idx);
        }
        true
    }
}
