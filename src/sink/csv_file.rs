// src/sink/csv_file.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::path::PathBuf;

use crate::scrape::types::{Book, RecordSink, PRICE_FIELD, TITLE_FIELD};

pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Header row plus one row per book; CRLF line endings, quoting as needed.
pub fn render_csv(books: &[Book]) -> Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    wtr.write_record([TITLE_FIELD, PRICE_FIELD])?;
    for b in books {
        wtr.write_record([b.title.as_str(), b.price.as_str()])?;
    }
    wtr.into_inner()
        .map_err(|e| anyhow!("flushing csv buffer: {}", e.error()))
}

#[async_trait]
impl RecordSink for CsvSink {
    async fn write(&self, books: &[Book]) -> Result<()> {
        let bytes = render_csv(books)?;
        super::overwrite_file(&self.path, bytes).await?;
        tracing::info!("saved {} books to {}", books.len(), self.path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}
