// src/scrape/mod.rs
pub mod extract;
pub mod fetch;
pub mod scheduler;
pub mod types;

use crate::scrape::types::{PageSource, RecordSink, RunOutcome, RunReport};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use once_cell::sync::OnceCell;
use std::time::Instant;

/// One-time metrics registration (so series show up once a recorder is installed).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("scrape_runs_total", "Scrape runs started.");
        describe_counter!(
            "scrape_runs_aborted_total",
            "Runs aborted because the page could not be fetched."
        );
        describe_counter!("scrape_fetch_attempts_total", "HTTP attempts made.");
        describe_counter!(
            "scrape_fetch_failures_total",
            "Fetches that exhausted the retry budget."
        );
        describe_counter!(
            "scrape_books_extracted_total",
            "Books extracted from listing pages."
        );
        describe_counter!("scrape_sink_errors_total", "Sink write failures.");
        describe_histogram!("scrape_extract_ms", "Extraction time in milliseconds.");
        describe_histogram!("scrape_run_ms", "Full run time in milliseconds.");
        describe_gauge!("scrape_last_run_ts", "Unix ts when a run last started.");
    });
}

/// Fetch -> extract -> sinks, for one fixed URL.
pub struct Scraper {
    url: String,
    source: Box<dyn PageSource>,
    sinks: Vec<Box<dyn RecordSink>>,
}

impl Scraper {
    pub fn new(
        url: impl Into<String>,
        source: Box<dyn PageSource>,
        sinks: Vec<Box<dyn RecordSink>>,
    ) -> Self {
        Self {
            url: url.into(),
            source,
            sinks,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sink names in execution order.
    pub fn sink_names(&self) -> Vec<&'static str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// Run the pipeline once. Sinks run in order; a failing sink is logged
    /// and does not stop the ones after it.
    pub async fn run_once(&self) -> RunReport {
        ensure_metrics_described();

        let started_at = chrono::Utc::now();
        let t0 = Instant::now();
        counter!("scrape_runs_total").increment(1);
        gauge!("scrape_last_run_ts").set(started_at.timestamp().max(0) as f64);
        tracing::info!(url = %self.url, source = self.source.name(), "starting scrape run");

        let outcome = match self.source.fetch(&self.url).await {
            None => {
                counter!("scrape_runs_aborted_total").increment(1);
                tracing::error!("run aborted: no HTML");
                RunOutcome::Aborted
            }
            Some(html) => {
                let books = extract::extract_books(&html);
                let mut sink_failures = 0usize;
                for sink in &self.sinks {
                    if let Err(e) = sink.write(&books).await {
                        sink_failures += 1;
                        counter!("scrape_sink_errors_total").increment(1);
                        tracing::error!(sink = sink.name(), error = ?e, "sink write failed");
                    }
                }
                RunOutcome::Completed {
                    records: books.len(),
                    sink_failures,
                }
            }
        };

        let elapsed = t0.elapsed();
        histogram!("scrape_run_ms").record(elapsed.as_secs_f64() * 1_000.0);
        tracing::info!(
            outcome = ?outcome,
            elapsed_ms = elapsed.as_millis() as u64,
            "scrape run finished"
        );

        RunReport {
            started_at,
            elapsed,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::types::Book;
    use anyhow::Result;
    use std::sync::{Arc, Mutex};

    struct FixedSource(Option<&'static str>);

    #[async_trait::async_trait]
    impl PageSource for FixedSource {
        async fn fetch(&self, _url: &str) -> Option<String> {
            self.0.map(str::to_string)
        }
        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    struct Recording {
        calls: Arc<Mutex<Vec<Vec<Book>>>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl RecordSink for Recording {
        async fn write(&self, books: &[Book]) -> Result<()> {
            self.calls.lock().unwrap().push(books.to_vec());
            if self.fail {
                anyhow::bail!("disk full");
            }
            Ok(())
        }
        fn name(&self) -> &'static str {
            "recording"
        }
    }

    const ONE: &str = r#"<article class="product_pod"><h3><a title="X">X</a></h3>
        <div class="product_price"><p class="price_color">£2.00</p></div></article>"#;

    #[tokio::test]
    async fn aborted_run_touches_no_sink() {
        let calls = Arc::new(Mutex::new(vec![]));
        let scraper = Scraper::new(
            "http://test.invalid/",
            Box::new(FixedSource(None)),
            vec![Box::new(Recording {
                calls: calls.clone(),
                fail: false,
            })],
        );
        let report = scraper.run_once().await;
        assert_eq!(report.outcome, RunOutcome::Aborted);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failing_sink_does_not_block_the_next() {
        let first = Arc::new(Mutex::new(vec![]));
        let second = Arc::new(Mutex::new(vec![]));
        let scraper = Scraper::new(
            "http://test.invalid/",
            Box::new(FixedSource(Some(ONE))),
            vec![
                Box::new(Recording {
                    calls: first.clone(),
                    fail: true,
                }),
                Box::new(Recording {
                    calls: second.clone(),
                    fail: false,
                }),
            ],
        );
        let report = scraper.run_once().await;
        assert_eq!(
            report.outcome,
            RunOutcome::Completed {
                records: 1,
                sink_failures: 1
            }
        );
        assert_eq!(second.lock().unwrap()[0], vec![Book::new("X", "2.00")]);
        assert_eq!(first.lock().unwrap().len(), 1);
    }
}
