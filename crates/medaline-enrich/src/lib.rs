//! Generative enrichment of athlete-event rows.
//!
//! Tallies medals per athlete, projects a capped prefix of the table into
//! compact JSON items, sends them to a chat-completions service in
//! fixed-size chunks, and merges archetype/health-point results back
//! positionally.

pub mod api;
pub mod config;
pub mod items;
pub mod medals;
pub mod parser;
pub mod runner;

// Re-exports for convenience
pub use config::Config;
pub use items::{EnrichmentItem, RECOGNIZED_FIELDS, build_item};
pub use medals::medal_counts;
pub use parser::parse_results;
pub use runner::{
    DEFAULT_ARCHETYPE, DEFAULT_HEALTH_POINTS, ENRICH_ROW_CAP, EnrichSummary, run,
};
