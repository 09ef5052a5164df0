//! Enrichment compute path over a CSV-loaded table, end to end minus the
//! service call: medal tally, item projection, and reply parsing.

use std::io::Write;

use medaline_core::Table;
use medaline_enrich::{build_item, medal_counts, parse_results};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Three athletes across five events. Vandelli medals twice (in different
/// Games), Park never, Howey once. Weight is partly missing.
const ATHLETES_CSV: &str = "\
ID,Name,Sex,Age,Height,Weight,Team,NOC,Year,Sport,Event,Medal
10,Marco Vandelli,M,24,185,80,Italy,ITA,1992,Swimming,Swimming Men's 200m,Gold
10,Marco Vandelli,M,24,185,80,Italy,ITA,1992,Swimming,Swimming Men's 400m,NA
10,Marco Vandelli,M,28,185,82,Italy,ITA,1996,Swimming,Swimming Men's 200m,Bronze
20,Ji-Sung Park,M,22,175,,South Korea,KOR,2000,Football,Football Men's Football,NA
30,Kate Howey,F,29,170,66,Great Britain,GBR,2000,Judo,Judo Women's Half-Middleweight,Silver
";

fn load_table(dir: &TempDir) -> Table {
    let path = dir.path().join("raw_data.csv");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(ATHLETES_CSV.as_bytes())
        .unwrap();
    Table::from_csv(&path).unwrap()
}

#[test]
fn tally_projects_into_items_a_compliant_reply_answers() {
    let _ = env_logger::builder().is_test(true).try_init();

    let tmp = TempDir::new().unwrap();
    let mut table = load_table(&tmp);

    // Career tally over the whole table, identical for every row of an
    // athlete
    let counts = medal_counts(&table).unwrap();
    assert_eq!(counts, vec![2, 2, 2, 0, 1]);
    table
        .set_column("medal_count", counts.iter().map(|c| c.to_string()).collect())
        .unwrap();

    // Project the first chunk into service items
    let items: Vec<_> = (0..table.n_rows()).map(|row| build_item(&table, row)).collect();

    // Only recognized fields make it into an item; Team/NOC/Year never do
    let first = &items[0];
    assert!(first.contains_key("Name"));
    assert!(first.contains_key("medal_count"));
    assert!(!first.contains_key("Team"));
    assert!(!first.contains_key("NOC"));
    assert!(!first.contains_key("Year"));

    assert_eq!(first.get("Name"), Some(&json!("Marco Vandelli")));
    assert_eq!(first.get("medal_count"), Some(&json!(2)));
    assert_eq!(first.get("Age"), Some(&json!(24)));

    // Park's missing weight travels as an explicit null
    assert_eq!(items[3].get("Weight"), Some(&Value::Null));

    // A compliant reply: one result per item, wrapped in {"items": [...]}
    let results: Vec<Value> = items
        .iter()
        .map(|item| {
            let medals = item.get("medal_count").and_then(Value::as_i64).unwrap();
            json!({
                "athlete_archetype": "steady technician",
                "health_points": 50 + 25 * medals,
            })
        })
        .collect();
    let reply = json!({ "items": results }).to_string();

    let parsed = parse_results(&reply).unwrap();
    assert_eq!(parsed.len(), items.len());
    assert_eq!(parsed[0]["health_points"], json!(100));
    assert_eq!(parsed[3]["health_points"], json!(50));
    assert_eq!(parsed[4]["health_points"], json!(75));

    // The same reply wrapped in a code fence still parses
    let fenced = format!("```json\n{reply}\n```");
    let parsed_fenced = parse_results(&fenced).unwrap();
    assert_eq!(parsed_fenced.len(), items.len());
}
