//! Team-name normalization for the name-based population lookup.

/// Normalize a team name into its lookup key.
///
/// Dataset team names carry squad suffixes (`China-2`, `Denmark/Sweden-1`)
/// that would defeat a plain name match. A missing cell normalizes to the
/// empty string, which no lookup key ever matches.
pub fn normalize_team(value: Option<&str>) -> String {
    let Some(value) = value else {
        return String::new();
    };

    let mut name = value.trim();
    if has_squad_suffix(name) {
        name = &name[..name.len() - 2];
    }

    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// True when the name ends in the two-character squad marker `-1`..`-4`.
fn has_squad_suffix(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() >= 2
        && bytes[bytes.len() - 2] == b'-'
        && (b'1'..=b'4').contains(&bytes[bytes.len() - 1])
}
