// src/sink/sqlite.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};

use crate::scrape::types::{Book, RecordSink};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS books (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT,
        price TEXT
    )
"#;

/// SQLite table sink: truncate-and-rewrite inside one transaction.
pub struct SqliteSink {
    db_path: PathBuf,
}

impl SqliteSink {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

/// Replace every row of `books` with `items`.
pub fn replace_all(db_path: &Path, items: &[Book]) -> Result<()> {
    if let Some(dir) = db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let mut conn = Connection::open(db_path)
        .with_context(|| format!("opening {}", db_path.display()))?;
    let tx = conn.transaction()?;
    tx.execute_batch(CREATE_TABLE)?;
    tx.execute("DELETE FROM books", [])?;
    {
        let mut stmt = tx.prepare("INSERT INTO books (title, price) VALUES (?1, ?2)")?;
        for b in items {
            stmt.execute(params![b.title, b.price])?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// All rows ordered by id.
pub fn load_books(db_path: &Path) -> Result<Vec<Book>> {
    let conn = Connection::open(db_path)?;
    let mut stmt = conn.prepare("SELECT title, price FROM books ORDER BY id ASC")?;
    let rows = stmt
        .query_map([], |row: &Row| {
            Ok(Book {
                title: row.get(0)?,
                price: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(rows)
}

#[async_trait]
impl RecordSink for SqliteSink {
    async fn write(&self, books: &[Book]) -> Result<()> {
        let path = self.db_path.clone();
        let items = books.to_vec();
        tokio::task::spawn_blocking(move || replace_all(&path, &items))
            .await
            .context("sqlite writer task")??;
        tracing::info!("saved {} books to {}", books.len(), self.db_path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}
