//! Defensive decoding of the enrichment response content.
//!
//! Models wrap JSON in prose or code fences often enough that the raw
//! content gets three parse attempts: the whole text, then the outermost
//! `{...}` slice, then the outermost `[...]` slice. The first attempt that
//! parses settles the shape: a parsed-but-unrecognized shape is a schema
//! error, not a reason to try the next slice.

use anyhow::{Result, bail};
use serde_json::Value;

/// Cap on raw content echoed into logs when parsing fails.
const SNIPPET_CHARS: usize = 500;

/// Parse the assistant content into the per-item result list.
///
/// Accepts either a wrapper object carrying an `items` array or a bare
/// array. Anything else fails the run.
pub fn parse_results(content: &str) -> Result<Vec<Value>> {
    let parsed = try_parse(content)
        .or_else(|| slice_between(content, '{', '}').and_then(try_parse))
        .or_else(|| slice_between(content, '[', ']').and_then(try_parse));

    let Some(data) = parsed else {
        log::error!(
            "Could not parse enrichment response; first {SNIPPET_CHARS} chars:\n{}",
            snippet(content)
        );
        bail!("enrichment service did not return parseable JSON");
    };

    match data {
        Value::Object(mut object) => match object.remove("items") {
            Some(Value::Array(items)) => Ok(items),
            Some(_) => bail!("unexpected enrichment response schema: 'items' is not an array"),
            None => bail!("unexpected enrichment response schema: object without 'items'"),
        },
        Value::Array(items) => Ok(items),
        _ => bail!("unexpected enrichment response schema"),
    }
}

fn try_parse(content: &str) -> Option<Value> {
    serde_json::from_str(content).ok()
}

/// Outermost `open..close` slice, when both ends exist in order.
fn slice_between(content: &str, open: char, close: char) -> Option<&str> {
    let start = content.find(open)?;
    let end = content.rfind(close)?;
    (end > start).then(|| &content[start..=end])
}

/// First `SNIPPET_CHARS` characters of the raw content, boundary-safe.
pub(crate) fn snippet(content: &str) -> &str {
    match content.char_indices().nth(SNIPPET_CHARS) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_content_wrapper_object() {
        let content = r#"{"items": [{"athlete_archetype": "snappy sprinter", "health_points": 75}]}"#;
        let results = parse_results(content).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["health_points"], 75);
    }

    #[test]
    fn whole_content_bare_array() {
        let content = r#"[{"athlete_archetype": "iron lifter"}, {"health_points": 50}]"#;
        assert_eq!(parse_results(content).unwrap().len(), 2);
    }

    #[test]
    fn fenced_object_recovered_by_slice() {
        let content = "```json\n{\"items\": [{\"health_points\": 100}]}\n```";
        let results = parse_results(content).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn prose_wrapped_array_reaches_third_strategy() {
        // The `{...}` slice spans two sibling objects and fails to parse;
        // the `[...]` slice then succeeds.
        let content = "Here are the results: [{\"a\": 1}, {\"a\": 2}] hope this helps!";
        let results = parse_results(content).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn object_without_items_is_schema_error() {
        let err = parse_results(r#"{"results": [1, 2]}"#).unwrap_err();
        assert!(err.to_string().contains("schema"));
    }

    #[test]
    fn non_array_items_is_schema_error() {
        let err = parse_results(r#"{"items": 3}"#).unwrap_err();
        assert!(err.to_string().contains("not an array"));
    }

    #[test]
    fn scalar_content_is_schema_error() {
        // Parses as JSON, so later slice strategies are not consulted
        let err = parse_results("42").unwrap_err();
        assert!(err.to_string().contains("schema"));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = parse_results("the model had nothing to say").unwrap_err();
        assert!(err.to_string().contains("parseable JSON"));
    }

    #[test]
    fn empty_content_is_a_parse_error() {
        assert!(parse_results("").is_err());
    }

    #[test]
    fn snippet_respects_char_boundaries() {
        let long = "é".repeat(SNIPPET_CHARS + 10);
        let cut = snippet(&long);
        assert_eq!(cut.chars().count(), SNIPPET_CHARS);

        let short = "fits";
        assert_eq!(snippet(short), "fits");
    }
}
