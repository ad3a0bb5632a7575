// src/app.rs
//! Composition root: owns the config and the scraper, starts and stops the scheduler.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::ScraperConfig;
use crate::scrape::fetch::HttpFetcher;
use crate::scrape::scheduler::spawn_scheduler;
use crate::scrape::types::RecordSink;
use crate::scrape::Scraper;
use crate::sink::{CsvSink, JsonSink, SqliteSink};

pub struct AppContext {
    pub config: ScraperConfig,
    pub scraper: Arc<Scraper>,
}

impl AppContext {
    /// Wire the HTTP fetcher and the three sinks (CSV, JSON, SQLite, in that order).
    pub fn from_config(config: ScraperConfig) -> Self {
        let config = config.sanitized();
        let sinks: Vec<Box<dyn RecordSink>> = vec![
            Box::new(CsvSink::new(config.csv_path.clone())),
            Box::new(JsonSink::new(config.json_path.clone())),
            Box::new(SqliteSink::new(config.sqlite_path.clone())),
        ];
        let scraper = Scraper::new(
            config.url.clone(),
            Box::new(HttpFetcher::from_config(&config)),
            sinks,
        );
        Self {
            config,
            scraper: Arc::new(scraper),
        }
    }

    pub fn with_scraper(config: ScraperConfig, scraper: Scraper) -> Self {
        Self {
            config: config.sanitized(),
            scraper: Arc::new(scraper),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.config.interval_secs)
    }

    /// Run on schedule until `signal` resolves, then stop the scheduler.
    /// Returns the number of runs started.
    pub async fn run_until<F>(self, signal: F) -> u64
    where
        F: Future,
    {
        let handle = spawn_scheduler(self.scraper.clone(), self.interval());
        info!(
            url = self.scraper.url(),
            interval_secs = self.config.interval_secs,
            "scheduler started"
        );

        signal.await;

        let runs = handle.runs();
        handle.shutdown().await;
        info!(runs, "scheduler stopped");
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sinks_run_file_then_document_then_table() {
        let app = AppContext::from_config(ScraperConfig::default());
        assert_eq!(app.scraper.sink_names(), vec!["csv", "json", "sqlite"]);
    }

    #[test]
    fn zero_interval_falls_back_to_default() {
        let cfg = ScraperConfig {
            interval_secs: 0,
            ..ScraperConfig::default()
        };
        let app = AppContext::from_config(cfg.clone());
        assert_eq!(app.interval(), Duration::from_secs(3600));

        let scraper = Scraper::new(
            "http://test.invalid/",
            Box::new(HttpFetcher::from_config(&cfg)),
            vec![],
        );
        let app = AppContext::with_scraper(cfg, scraper);
        assert_eq!(app.interval(), Duration::from_secs(3600));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_schedules_without_panicking() {
        let cfg = ScraperConfig {
            interval_secs: 0,
            ..ScraperConfig::default()
        };
        let scraper = Scraper::new(cfg.url.clone(), Box::new(NoPage), vec![]);
        let runs = AppContext::with_scraper(cfg, scraper)
            .run_until(tokio::time::sleep(Duration::from_secs(1)))
            .await;
        assert_eq!(runs, 1);
    }

    struct NoPage;

    #[async_trait::async_trait]
    impl crate::scrape::types::PageSource for NoPage {
        async fn fetch(&self, _url: &str) -> Option<String> {
            None
        }
        fn name(&self) -> &'static str {
            "none"
        }
    }
}
