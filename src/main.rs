// src/main.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use log::info;

use dvr_cleanup::cli::{Cli, Mode};
use dvr_cleanup::config::{self, WEBHOOK_URL_ENV};
use dvr_cleanup::{DiscordNotifier, HttpDvr, Runner};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();

    // ------------------------------------------------------------
    // Config
    // ------------------------------------------------------------
    if let Ok(path) = dotenvy::dotenv() {
        info!("[dvr-cleanup] loaded environment from {}", path.display());
    }

    let cfg = config::load(&cli.config);
    let webhook_url = std::env::var(WEBHOOK_URL_ENV).ok();

    let dvr = HttpDvr::new(&cfg.dvr_ip);
    let notifier = DiscordNotifier::new(cfg.discord.clone(), webhook_url);
    info!("[dvr-cleanup] using DVR at {}", dvr.base_url());

    // ------------------------------------------------------------
    // Graceful shutdown
    // ------------------------------------------------------------
    let mode = cli.mode();
    let running = Arc::new(AtomicBool::new(true));
    if mode == Mode::Continuous {
        let r = running.clone();
        ctrlc::set_handler(move || {
            info!("[dvr-cleanup] shutdown requested");
            r.store(false, Ordering::SeqCst);
        })?;
    }

    Runner::new(&cfg, &dvr, &notifier).run(mode, cli.max_episodes, &running);

    Ok(())
}
