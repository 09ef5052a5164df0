//! Medaline Core - Common infrastructure for the athlete enrichment pipeline
//!
//! This crate provides the pieces shared by every pipeline stage: the
//! blocking HTTP bridge, logging, progress reporting, and the in-memory
//! tabular model backing the athlete-event CSV.

pub mod http;
pub mod logging;
pub mod progress;
pub mod table;

// Re-exports for convenience
pub use http::{SHARED_RUNTIME, http_client};
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ProgressContext, SharedProgress, fmt_num};
pub use table::{Table, is_missing};
