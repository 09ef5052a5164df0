//! Ordered population resolution over the three lookup tables.

use std::fmt;

use crate::index::PopulationIndex;
use crate::normalize::normalize_team;

/// One fallback tier: which table to consult and how to derive its key from
/// the row's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// By-IOC table, keyed by the uppercased NOC code.
    IocCode,
    /// By-ISO table, keyed by the uppercased NOC code.
    IsoCode,
    /// By-name table, keyed by the normalized team name.
    TeamName,
}

/// Resolution order. Earlier tiers win.
pub const RESOLUTION_ORDER: [Tier; 3] = [Tier::IocCode, Tier::IsoCode, Tier::TeamName];

impl Tier {
    /// Derive this tier's lookup key from the row fields; `None` when the
    /// field is missing or normalizes to nothing.
    fn key(self, noc: Option<&str>, team: Option<&str>) -> Option<String> {
        match self {
            Self::IocCode | Self::IsoCode => noc.map(str::to_uppercase),
            Self::TeamName => {
                let key = normalize_team(team);
                (!key.is_empty()).then_some(key)
            }
        }
    }

    fn lookup(self, index: &PopulationIndex, key: &str) -> Option<i64> {
        match self {
            Self::IocCode => index.population_by_ioc(key),
            Self::IsoCode => index.population_by_iso(key),
            Self::TeamName => index.population_by_name(key),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IocCode => write!(f, "IOC code"),
            Self::IsoCode => write!(f, "ISO code"),
            Self::TeamName => write!(f, "team name"),
        }
    }
}

/// Resolve a row's population through the tiers in order.
///
/// Returns the winning tier alongside the population, or `None` when no
/// tier hits; never a sentinel value.
pub fn resolve(
    index: &PopulationIndex,
    noc: Option<&str>,
    team: Option<&str>,
) -> Option<(Tier, i64)> {
    RESOLUTION_ORDER.iter().find_map(|tier| {
        let key = tier.key(noc, team)?;
        tier.lookup(index, &key).map(|population| (*tier, population))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::CountryRecord;

    fn index_from(payload: &str) -> PopulationIndex {
        let records: Vec<CountryRecord> = serde_json::from_str(payload).unwrap();
        PopulationIndex::build(&records)
    }

    #[test]
    fn ioc_beats_iso_beats_name() {
        // Distinct populations per key so the winning tier is observable
        let index = index_from(
            r#"[
                {"name": {"common": "Iocland"}, "cioc": "XXX", "population": 1},
                {"name": {"common": "Isoland"}, "cca3": "XXX", "population": 2},
                {"name": {"common": "Nameland"}, "cca3": "NML", "population": 3}
            ]"#,
        );

        assert_eq!(
            resolve(&index, Some("XXX"), Some("Nameland")),
            Some((Tier::IocCode, 1))
        );

        let no_ioc = index_from(
            r#"[
                {"name": {"common": "Isoland"}, "cca3": "XXX", "population": 2},
                {"name": {"common": "Nameland"}, "cca3": "NML", "population": 3}
            ]"#,
        );
        assert_eq!(
            resolve(&no_ioc, Some("XXX"), Some("Nameland")),
            Some((Tier::IsoCode, 2))
        );
        assert_eq!(
            resolve(&no_ioc, Some("ZZZ"), Some("Nameland")),
            Some((Tier::TeamName, 3))
        );
    }

    #[test]
    fn squad_suffix_reaches_name_tier() {
        let index = index_from(
            r#"[{"name": {"common": "Great Britain"}, "cca3": "GBR", "population": 67215293}]"#,
        );
        // Historic NOC code not in the reference, squad-suffixed team name is
        assert_eq!(
            resolve(&index, Some("GBR-OLD"), Some("Great Britain-1")),
            Some((Tier::TeamName, 67215293))
        );
    }

    #[test]
    fn noc_lookup_is_case_insensitive() {
        let index =
            index_from(r#"[{"name": {"common": "Kenya"}, "cioc": "KEN", "population": 53771296}]"#);
        assert_eq!(
            resolve(&index, Some("ken"), None),
            Some((Tier::IocCode, 53771296))
        );
    }

    #[test]
    fn total_miss_is_none_not_zero() {
        let index =
            index_from(r#"[{"name": {"common": "Kenya"}, "cioc": "KEN", "population": 53771296}]"#);
        assert_eq!(resolve(&index, Some("URS"), Some("Soviet Union")), None);
        assert_eq!(resolve(&index, None, None), None);
    }
}
