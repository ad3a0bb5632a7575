//! books-scraper: binary entrypoint.
//! Loads config, starts the hourly scheduler and waits for Ctrl-C.

use books_scraper::{config, telemetry, AppContext};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let cfg = config::load_config_default()?;
    info!(url = %cfg.url, "starting scraper");

    let app = AppContext::from_config(cfg);
    app.run_until(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "could not listen for ctrl-c; stopping");
        }
    })
    .await;

    Ok(())
}
