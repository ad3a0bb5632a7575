// src/sink/json_doc.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

use crate::scrape::types::{Book, RecordSink};

pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSink for JsonSink {
    async fn write(&self, books: &[Book]) -> Result<()> {
        // serde_json writes non-ASCII as-is; pretty printer indents by two spaces.
        let bytes = serde_json::to_vec_pretty(books).context("serializing books")?;
        super::overwrite_file(&self.path, bytes).await?;
        tracing::info!("saved {} books to {}", books.len(), self.path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json"
    }
}
