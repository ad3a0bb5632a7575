// src/scrape/scheduler.rs
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::scrape::Scraper;

/// Owned by the composition root. Dropping it also stops the loop, but without
/// waiting for an in-flight run.
pub struct SchedulerHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
    runs: Arc<AtomicU64>,
}

impl SchedulerHandle {
    /// Number of runs started so far.
    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::SeqCst)
    }

    /// Stop scheduling. An in-flight run is allowed to finish.
    pub async fn shutdown(self) {
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "scheduler task ended abnormally");
        }
    }
}

/// Fire `scraper.run_once()` now and then every `interval`.
///
/// Runs execute inline on the scheduler task, so they never overlap. Ticks
/// missed while a run is in flight are skipped rather than bunched up.
pub fn spawn_scheduler(scraper: Arc<Scraper>, interval: Duration) -> SchedulerHandle {
    let (stop_tx, mut stop_rx) = watch::channel(false);
    let runs = Arc::new(AtomicU64::new(0));
    let runs_task = runs.clone();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = stop_rx.changed() => break,
                _ = ticker.tick() => {}
            }
            if *stop_rx.borrow() {
                break;
            }

            runs_task.fetch_add(1, Ordering::SeqCst);
            let report = scraper.run_once().await;
            tracing::debug!(
                target: "scheduler",
                started_at = %report.started_at.to_rfc3339(),
                outcome = ?report.outcome,
                "tick done"
            );
        }
        tracing::info!(target: "scheduler", "scheduler loop exited");
    });

    SchedulerHandle {
        stop_tx,
        task,
        runs,
    }
}
