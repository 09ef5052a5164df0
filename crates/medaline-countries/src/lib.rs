//! Country population reference for athlete-event rows.
//!
//! Fetches the REST Countries payload, indexes populations by IOC code,
//! ISO code, and normalized common name, and resolves every row of the
//! table through those tiers in order.

pub mod api;
pub mod index;
pub mod normalize;
pub mod resolver;
pub mod runner;

// Re-exports for convenience
pub use index::{CountryRecord, PopulationIndex};
pub use normalize::normalize_team;
pub use resolver::{RESOLUTION_ORDER, Tier, resolve};
pub use runner::{Config, DEFAULT_BASE_URL, PopulateSummary, run};
