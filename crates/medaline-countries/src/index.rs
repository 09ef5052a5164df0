//! REST Countries payload schema and the population lookup index.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer};

/// One entry of the REST Countries payload, read defensively: any field may
/// be absent, and a population that is not a plain JSON integer is dropped.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryRecord {
    #[serde(default)]
    pub name: Option<CountryName>,
    #[serde(default)]
    pub cca3: Option<String>,
    #[serde(default)]
    pub cioc: Option<String>,
    #[serde(default, deserialize_with = "integer_or_none")]
    pub population: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryName {
    #[serde(default)]
    pub common: Option<String>,
}

/// Keep a population only when the JSON value is a true integer; floats,
/// strings, and null all become `None`.
fn integer_or_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<serde_json::Value>::deserialize(deserializer)
        .map(|opt| opt.and_then(|v| v.as_i64()))
}

/// Population lookup tables keyed three ways.
///
/// Duplicate keys follow payload order: the last entry wins.
#[derive(Debug, Default)]
pub struct PopulationIndex {
    by_ioc: FxHashMap<String, i64>,
    by_iso: FxHashMap<String, i64>,
    by_name: FxHashMap<String, i64>,
}

impl PopulationIndex {
    /// Build the index from a decoded payload, skipping entries without an
    /// integer population and keys that are absent or empty.
    pub fn build(records: &[CountryRecord]) -> Self {
        let mut index = Self::default();
        for record in records {
            let Some(population) = record.population else {
                continue;
            };
            if let Some(ioc) = non_empty(record.cioc.as_deref()) {
                index.by_ioc.insert(ioc.to_uppercase(), population);
            }
            if let Some(iso) = non_empty(record.cca3.as_deref()) {
                index.by_iso.insert(iso.to_uppercase(), population);
            }
            let common = record.name.as_ref().and_then(|n| n.common.as_deref());
            if let Some(name) = non_empty(common) {
                index.by_name.insert(name.trim().to_lowercase(), population);
            }
        }
        index
    }

    pub fn population_by_ioc(&self, code: &str) -> Option<i64> {
        self.by_ioc.get(code).copied()
    }

    pub fn population_by_iso(&self, code: &str) -> Option<i64> {
        self.by_iso.get(code).copied()
    }

    pub fn population_by_name(&self, name: &str) -> Option<i64> {
        self.by_name.get(name).copied()
    }

    /// (by-IOC, by-ISO, by-name) entry counts, for summary logging.
    pub fn sizes(&self) -> (usize, usize, usize) {
        (self.by_ioc.len(), self.by_iso.len(), self.by_name.len())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
