// src/scrape/fetch.rs
use async_trait::async_trait;
use metrics::counter;
use rand::Rng;
use reqwest::{header::USER_AGENT, Client, StatusCode};
use std::future::Future;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::scraper::ScraperConfig;
use crate::scrape::types::PageSource;

pub const DEFAULT_USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0.3 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36",
    "Mozilla/5.0 (Windows NT 6.1; WOW64; rv:40.0) Gecko/20100101 Firefox/40.1",
];

#[derive(Debug, Clone)]
pub struct FetchPolicy {
    pub max_retries: u32,
    pub delay_min: Duration,
    pub delay_max: Duration,
    pub timeout: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay_min: Duration::from_secs(1),
            delay_max: Duration::from_secs(3),
            timeout: Duration::from_secs(10),
        }
    }
}

impl FetchPolicy {
    pub fn from_config(cfg: &ScraperConfig) -> Self {
        Self {
            max_retries: cfg.max_retries,
            delay_min: Duration::from_millis(cfg.retry_delay_min_ms),
            delay_max: Duration::from_millis(cfg.retry_delay_max_ms),
            timeout: Duration::from_secs(cfg.request_timeout_secs),
        }
    }

    /// Uniform jitter in `[delay_min, delay_max]`.
    fn next_delay(&self) -> Duration {
        let lo = self.delay_min.as_millis() as u64;
        let hi = (self.delay_max.as_millis() as u64).max(lo);
        Duration::from_millis(rand::rng().random_range(lo..=hi))
    }
}

/// Plain GET with a rotating `User-Agent` and a bounded number of attempts.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    policy: FetchPolicy,
    user_agents: Vec<String>,
}

impl HttpFetcher {
    pub fn new(policy: FetchPolicy, user_agents: Vec<String>) -> Self {
        let user_agents = if user_agents.is_empty() {
            DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect()
        } else {
            user_agents
        };
        Self {
            client: Client::new(),
            policy,
            user_agents,
        }
    }

    pub fn from_config(cfg: &ScraperConfig) -> Self {
        Self::new(FetchPolicy::from_config(cfg), cfg.user_agents.clone())
    }

    fn pick_user_agent(&self) -> &str {
        let i = rand::rng().random_range(0..self.user_agents.len());
        &self.user_agents[i]
    }

    /// One attempt. `None` means "retry".
    async fn attempt(&self, url: &str) -> Option<String> {
        let res = self
            .client
            .get(url)
            .header(USER_AGENT, self.pick_user_agent())
            .timeout(self.policy.timeout)
            .send()
            .await;

        match res {
            Ok(rsp) if rsp.status() == StatusCode::OK => match rsp.text().await {
                Ok(body) => Some(body),
                Err(e) => {
                    error!(error = %e, "reading response body failed");
                    None
                }
            },
            Ok(rsp) => {
                warn!(status = rsp.status().as_u16(), "unexpected status code");
                None
            }
            Err(e) => {
                error!(error = %e, "request failed");
                None
            }
        }
    }

    pub async fn fetch_page(&self, url: &str) -> Option<String> {
        let body = retry_jittered(&self.policy, |attempt| async move {
            info!(url, attempt, "requesting page");
            counter!("scrape_fetch_attempts_total").increment(1);
            self.attempt(url).await
        })
        .await;

        if body.is_none() {
            counter!("scrape_fetch_failures_total").increment(1);
            error!(
                url,
                attempts = self.policy.max_retries.max(1),
                "could not fetch page after several attempts"
            );
        }
        body
    }
}

/// Call `attempt` (1-based) until it yields `Some` or the budget is spent,
/// sleeping a jittered delay between attempts but never after the last one.
pub async fn retry_jittered<T, F, Fut>(policy: &FetchPolicy, mut attempt: F) -> Option<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let budget = policy.max_retries.max(1);
    for n in 1..=budget {
        if let Some(v) = attempt(n).await {
            return Some(v);
        }
        if n < budget {
            let delay = policy.next_delay();
            info!("waiting {:.1}s before next attempt", delay.as_secs_f64());
            tokio::time::sleep(delay).await;
        }
    }
    None
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        self.fetch_page(url).await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
