// src/lib.rs
// Public library surface for integration tests and the binary.

pub mod app;
pub mod config;
pub mod scrape;
pub mod sink;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::app::AppContext;
pub use crate::scrape::types::{Book, PageSource, RecordSink, RunOutcome, RunReport};
pub use crate::scrape::Scraper;
