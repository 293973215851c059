//! Update Sentinel — Binary Entrypoint
//! One complete pipeline pass per invocation; an external scheduler (cron,
//! CI workflow) drives the cadence.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use update_sentinel::config::AppConfig;
use update_sentinel::notify::telegram::TelegramNotifier;
use update_sentinel::{pipeline, sources};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("update_sentinel=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when the vars come from the scheduler.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::from_env();
    if cfg.bot_token.is_none() {
        tracing::info!("TELEGRAM_BOT_TOKEN unset, running in dry mode");
    }

    let client = sources::http_client()?;
    let fetchers = sources::default_fetchers(&client);
    let notifier = TelegramNotifier::new(cfg.bot_token.clone(), cfg.recipients.clone(), client);

    // Source failures are absorbed inside the pipeline; only a cache persist
    // failure reaches here and fails the run.
    let summary = pipeline::run(&cfg, &fetchers, &notifier).await?;
    tracing::info!(
        total = summary.total,
        fresh = summary.fresh,
        delivered = summary.delivered,
        "done"
    );
    Ok(())
}
