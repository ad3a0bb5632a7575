// src/sink/mod.rs
//! Persistence targets. Each one replaces its destination wholesale on every write.

pub mod csv_file;
pub mod json_doc;
pub mod sqlite;

use anyhow::{Context, Result};
use std::path::Path;

pub use csv_file::CsvSink;
pub use json_doc::JsonSink;
pub use sqlite::SqliteSink;

/// Overwrite `path` with `bytes`, creating parent directories first.
pub(crate) async fn overwrite_file(path: &Path, bytes: Vec<u8>) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("writing {}", path.display()))
}
