//! Projection of table rows into enrichment request items.

use medaline_core::Table;
use serde_json::{Map, Number, Value};

/// Fields offered to the enrichment service. A field appears in an item
/// only when its column exists in the table.
pub const RECOGNIZED_FIELDS: [&str; 8] = [
    "Name",
    "Sport",
    "Event",
    "Sex",
    "Age",
    "Height",
    "Weight",
    "medal_count",
];

/// One request item: recognized fields mapped to scalar JSON values.
pub type EnrichmentItem = Map<String, Value>;

/// Build the item for one row.
///
/// A missing cell becomes an explicit null so the service sees the gap
/// rather than a silently absent field.
pub fn build_item(table: &Table, row: usize) -> EnrichmentItem {
    let mut item = Map::new();
    for field in RECOGNIZED_FIELDS {
        if !table.has_column(field) {
            continue;
        }
        let value = match table.value(row, field) {
            Some(cell) => typed_cell(cell),
            None => Value::Null,
        };
        item.insert(field.to_string(), value);
    }
    item
}

/// Type a CSV cell the way the service expects: integers and floats as
/// JSON numbers, everything else as text.
fn typed_cell(cell: &str) -> Value {
    if let Ok(n) = cell.parse::<i64>() {
        return Value::from(n);
    }
    if let Ok(f) = cell.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::from(cell)
}
