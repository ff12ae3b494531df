//! Wisdom bot - posts a random wisdom with its image every morning.
//!
//! Loads the configuration, reports what the content store holds, and then
//! fires the posting job on the configured cron schedule until interrupted.

mod observability;

use clap::Parser;
use observability::{ObservabilityConfig, init_observability};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use wisdom_bot::{Composer, Scheduler, Selector, WisdomConfig, WisdomJob};
use wisdom_social::{MastodonPublisher, Publisher};
use wisdom_store::{FileSystemStore, WisdomStore};

/// Command-line arguments for the wisdom bot.
#[derive(Parser, Debug)]
#[command(name = "wisdom")]
#[command(about = "Posts a random wisdom with its image to Mastodon every day")]
#[command(version)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "WISDOM_CONFIG", default_value = "wisdom.toml")]
    config: PathBuf,

    /// Validate configuration and report the store, then exit
    #[arg(long)]
    dry_run: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_observability(&observability_config(&args))?;

    info!(config_file = ?args.config, "Loading configuration");
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e);
        }
    };

    let store = Arc::new(FileSystemStore::new(&config.store.directory));
    let wisdoms = store.enumerate_candidates().await.len();
    info!(
        count = wisdoms,
        directory = %config.store.directory.display(),
        "Bot started. {} wisdoms found in {}",
        wisdoms,
        config.store.directory.display()
    );
    if wisdoms == 0 {
        warn!("Store is empty, every run will abort until wisdoms are added");
    }

    let schedule = config.cron_schedule()?;
    info!(
        cron = %schedule.expression(),
        timezone = %schedule.timezone(),
        locale = %config.text.locale,
        endpoint = %config.service.endpoint,
        "Configuration loaded"
    );

    if args.dry_run {
        info!("DRY RUN MODE - Nothing will be posted");
        return Ok(());
    }

    let publisher = Arc::new(MastodonPublisher::new(&config.service)?);
    info!(service = publisher.service_name(), "Publisher ready");

    let job = WisdomJob::new(
        store,
        Selector::from_entropy(),
        Composer::from_entropy(Arc::new(config.phrase_pools()?)),
        publisher,
    );
    let scheduler = Scheduler::new(schedule, Arc::new(job));

    let fired = scheduler.run_until(shutdown_signal()).await;
    info!(runs = fired, "Wisdom bot stopped");

    Ok(())
}

fn observability_config(args: &Args) -> ObservabilityConfig {
    let config = ObservabilityConfig::new().with_json_logs(args.json_logs);
    if args.verbose {
        config.with_log_level("debug")
    } else {
        config
    }
}

fn load_config(args: &Args) -> Result<WisdomConfig, Box<dyn std::error::Error>> {
    let config = WisdomConfig::from_file(&args.config)?;
    config.validate()?;
    Ok(config)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => {
            warn!(error = %e, "Cannot listen for shutdown signal, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
