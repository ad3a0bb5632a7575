// src/scrape/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::time::Duration;

pub const TITLE_SENTINEL: &str = "(no title)";
pub const PRICE_SENTINEL: &str = "(no price)";

/// Column names shared by the CSV header and the JSON document keys.
pub const TITLE_FIELD: &str = "Название";
pub const PRICE_FIELD: &str = "Цена";

/// One listing entry. Price stays a string (currency symbol already stripped).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Book {
    #[serde(rename = "Название")]
    pub title: String,
    #[serde(rename = "Цена")]
    pub price: String,
}

impl Book {
    pub fn new(title: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            price: price.into(),
        }
    }
}

/// Where the raw page comes from. Failure carries no reason, only absence.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Option<String>;
    fn name(&self) -> &'static str;
}

/// A persistence target that fully overwrites its prior contents on every write.
#[async_trait::async_trait]
pub trait RecordSink: Send + Sync {
    async fn write(&self, books: &[Book]) -> Result<()>;
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Page fetched and extracted; `sink_failures` sinks returned an error.
    Completed { records: usize, sink_failures: usize },
    /// Fetch budget exhausted; no sink was invoked.
    Aborted,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub outcome: RunOutcome,
}

impl RunReport {
    pub fn records(&self) -> Option<usize> {
        match self.outcome {
            RunOutcome::Completed { records, .. } => Some(records),
            RunOutcome::Aborted => None,
        }
    }
}
